//! Shelter invite API endpoints.
//!
//! Invite tokens travel in the URL path for the public status probe and the
//! acceptance call; both resolve the invite by one-way hash.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{created, success, ApiResult};
use crate::auth::{self, CurrentUser, MANAGER_UP};
use crate::errors::AppError;
use crate::models::{
    CreateInviteRequest, InviteCreated, InviteValidation, ShelterInvite, ShelterRole,
};
use crate::AppState;

/// POST /api/shelters/:id/invites - Invite a user to join a shelter.
pub async fn create_invite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(shelter_id): Path<String>,
    Json(request): Json<CreateInviteRequest>,
) -> ApiResult<InviteCreated> {
    let guard = state.repo.shelter_guard(&shelter_id, MANAGER_UP).await?;
    guard.assert(&user)?;

    if !request.email.contains('@') {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    let role = ShelterRole::parse(&request.role)
        .ok_or_else(|| AppError::Validation(format!("Unknown shelter role: {}", request.role)))?;
    if role == ShelterRole::Owner {
        return Err(AppError::Validation(
            "Owners cannot be invited; transfer ownership instead".to_string(),
        ));
    }

    let ttl_minutes = request
        .ttl_minutes
        .unwrap_or(state.config.invite_ttl_minutes);
    if ttl_minutes < 0 {
        return Err(AppError::Validation(
            "ttlMinutes must not be negative".to_string(),
        ));
    }

    let token = auth::generate_token();
    let invite = state
        .repo
        .create_invite(
            &shelter_id,
            &request,
            role,
            &auth::hash_token(&token),
            ttl_minutes,
            &user.id,
        )
        .await?;

    // Mail delivery is a collaborator; the raw token is handed back once.
    tracing::info!(invite_id = %invite.id, shelter_id = %shelter_id, "shelter invite created");

    created(InviteCreated { invite, token })
}

/// GET /api/shelters/:id/invites - List a shelter's invites.
pub async fn list_shelter_invites(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(shelter_id): Path<String>,
) -> ApiResult<Vec<ShelterInvite>> {
    let guard = state.repo.shelter_guard(&shelter_id, MANAGER_UP).await?;
    guard.assert(&user)?;

    let invites = state.repo.list_shelter_invites(&shelter_id).await?;
    success(invites)
}

/// GET /api/invites/:token - Public status probe for an invite token.
pub async fn invite_status(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<InviteValidation> {
    let validation = state.repo.validate_invite(&auth::hash_token(&token)).await?;
    success(validation)
}

/// POST /api/invites/:token/accept - Consume an invite and join the shelter.
pub async fn accept_invite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(token): Path<String>,
) -> ApiResult<ShelterInvite> {
    let invite = state
        .repo
        .accept_invite(&auth::hash_token(&token), &user.id)
        .await?;

    tracing::info!(invite_id = %invite.id, user_id = %user.id, "shelter invite accepted");
    success(invite)
}

/// POST /api/invites/:id/revoke - Revoke a pending invite.
pub async fn revoke_invite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<ShelterInvite> {
    let invite = state
        .repo
        .get_invite(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Invite {} not found", id)))?;

    let guard = state.repo.shelter_guard(&invite.shelter_id, MANAGER_UP).await?;
    guard.assert(&user)?;

    let invite = state.repo.revoke_invite(&id).await?;
    success(invite)
}

/// POST /api/invites/:id/resend - Re-send a pending invite's link.
pub async fn resend_invite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<ShelterInvite> {
    let invite = state
        .repo
        .get_invite(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Invite {} not found", id)))?;

    let guard = state.repo.shelter_guard(&invite.shelter_id, MANAGER_UP).await?;
    guard.assert(&user)?;

    let invite = state.repo.touch_invite_resend(&id).await?;
    // Same link, same token; the stored hash cannot reproduce it
    tracing::info!(invite_id = %invite.id, "shelter invite resend requested");
    success(invite)
}
