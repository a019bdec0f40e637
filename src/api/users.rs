//! Account and session API endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use super::{created, success, ApiResult};
use crate::auth::{self, AdminUser, CurrentUser};
use crate::errors::AppError;
use crate::models::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateUserRoleRequest, User, UserRole,
};
use crate::AppState;

/// POST /api/auth/register - Create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if !request.email.contains('@') {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    if request.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let password_hash = Some(auth::hash_password(&request.password)?);
    let user = state.repo.create_user(&request, password_hash).await?;

    let token = auth::generate_token();
    state
        .repo
        .create_session(
            &user.id,
            &auth::hash_token(&token),
            state.config.session_ttl_minutes,
        )
        .await?;

    created(AuthResponse { token, user })
}

/// POST /api/auth/login - Exchange credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let Some((user, stored_hash)) = state.repo.find_user_with_password(&request.email).await?
    else {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    };

    // Social accounts carry no password hash
    let Some(stored_hash) = stored_hash else {
        return Err(AppError::Unauthorized(
            "Password login is not available for this account".to_string(),
        ));
    };

    if !auth::verify_password(&request.password, &stored_hash)? {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = auth::generate_token();
    state
        .repo
        .create_session(
            &user.id,
            &auth::hash_token(&token),
            state.config.session_ttl_minutes,
        )
        .await?;

    success(AuthResponse { token, user })
}

/// POST /api/auth/logout - Delete the presented session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<()> {
    if let Some(token) = auth::bearer_token(&headers) {
        state.repo.delete_session(&auth::hash_token(&token)).await?;
    }
    success(())
}

/// GET /api/auth/me - The authenticated caller's account.
pub async fn me(CurrentUser(user): CurrentUser) -> ApiResult<User> {
    success(user)
}

/// PATCH /api/users/:id/role - Admin role change.
pub async fn set_user_role(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRoleRequest>,
) -> ApiResult<User> {
    let role = UserRole::parse(&request.role)
        .ok_or_else(|| AppError::Validation(format!("Unknown role: {}", request.role)))?;

    let user = state.repo.set_user_role(&id, role).await?;
    success(user)
}
