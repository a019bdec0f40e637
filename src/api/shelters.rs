//! Shelter API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{created, success, ApiResult};
use crate::auth::{AdminUser, CurrentUser, ANY_STAFF, MANAGER_UP};
use crate::errors::AppError;
use crate::models::{
    CreateShelterRequest, Shelter, ShelterMemberView, ShelterRole, ShelterStatus,
    UpdateShelterRequest, UpdateShelterStatusRequest,
};
use crate::AppState;

/// Shelter listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ShelterListQuery {
    #[serde(default)]
    pub status: Option<String>,
}

/// GET /api/shelters - List shelters.
pub async fn list_shelters(
    State(state): State<AppState>,
    Query(params): Query<ShelterListQuery>,
) -> ApiResult<Vec<Shelter>> {
    let status = match params.status.as_deref() {
        Some(s) => Some(
            ShelterStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("Unknown shelter status: {}", s)))?,
        ),
        None => None,
    };

    let shelters = state.repo.list_shelters(status).await?;
    success(shelters)
}

/// GET /api/shelters/:id - Get a single shelter.
pub async fn get_shelter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Shelter> {
    match state.repo.get_shelter(&id).await? {
        Some(shelter) => success(shelter),
        None => Err(AppError::NotFound(format!("Shelter {} not found", id))),
    }
}

/// POST /api/shelters - Apply as a shelter; the applicant becomes owner.
pub async fn create_shelter(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateShelterRequest>,
) -> ApiResult<Shelter> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if !request.contact_email.contains('@') {
        return Err(AppError::Validation(
            "A valid contact email is required".to_string(),
        ));
    }

    let shelter = state.repo.create_shelter(&request, &user.id).await?;
    created(shelter)
}

/// PATCH /api/shelters/:id - Update a shelter profile.
pub async fn update_shelter(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateShelterRequest>,
) -> ApiResult<Shelter> {
    let guard = state.repo.shelter_guard(&id, MANAGER_UP).await?;
    guard.assert(&user)?;

    let shelter = state.repo.update_shelter(&id, &request).await?;
    success(shelter)
}

/// PATCH /api/shelters/:id/status - Admin moderation of a shelter.
pub async fn set_shelter_status(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateShelterStatusRequest>,
) -> ApiResult<Shelter> {
    let status = ShelterStatus::parse(&request.status).ok_or_else(|| {
        AppError::Validation(format!("Unknown shelter status: {}", request.status))
    })?;

    let shelter = state.repo.set_shelter_status(&id, status).await?;
    success(shelter)
}

/// GET /api/shelters/:id/members - List shelter staff.
pub async fn list_shelter_members(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Vec<ShelterMemberView>> {
    let guard = state.repo.shelter_guard(&id, ANY_STAFF).await?;
    guard.assert(&user)?;

    let members = state.repo.list_shelter_members(&id).await?;
    success(members)
}

/// DELETE /api/shelters/:id/members/:user_id - Remove a member.
pub async fn remove_shelter_member(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, member_id)): Path<(String, String)>,
) -> ApiResult<()> {
    let guard = state.repo.shelter_guard(&id, MANAGER_UP).await?;
    let acting_role = guard.assert(&user)?;

    // Only an owner may remove an owner
    let target_role = state.repo.membership_role(&id, &member_id).await?;
    if target_role == Some(ShelterRole::Owner) && acting_role != ShelterRole::Owner {
        return Err(AppError::Forbidden(
            "Only an owner can remove an owner".to_string(),
        ));
    }

    state.repo.remove_shelter_member(&id, &member_id).await?;
    success(())
}
