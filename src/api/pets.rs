//! Pet API endpoints. Browsing is public; mutation requires shelter staff.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{clamp_paging, created, success, ApiResult};
use crate::auth::{CurrentUser, ANY_STAFF, MANAGER_UP};
use crate::errors::AppError;
use crate::models::{CreatePetRequest, Page, Pet, PetStatus, UpdatePetRequest};
use crate::AppState;

/// Pet listing query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

/// GET /api/pets - Browse pets.
pub async fn list_pets(
    State(state): State<AppState>,
    Query(params): Query<PetListQuery>,
) -> ApiResult<Page<Pet>> {
    let status = match params.status.as_deref() {
        Some(s) => Some(
            PetStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("Unknown pet status: {}", s)))?,
        ),
        None => None,
    };
    let (page, page_size) = clamp_paging(params.page, params.page_size);

    let pets = state
        .repo
        .list_pets(
            status,
            params.species.as_deref(),
            params.q.as_deref().filter(|q| !q.trim().is_empty()),
            page,
            page_size,
        )
        .await?;

    success(pets)
}

/// GET /api/pets/:id - Get a single pet.
pub async fn get_pet(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Pet> {
    match state.repo.get_pet(&id).await? {
        Some(pet) => success(pet),
        None => Err(AppError::NotFound(format!("Pet {} not found", id))),
    }
}

/// POST /api/pets - List a new pet.
pub async fn create_pet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreatePetRequest>,
) -> ApiResult<Pet> {
    let guard = state.repo.shelter_guard(&request.shelter_id, ANY_STAFF).await?;
    guard.assert(&user)?;

    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if request.species.trim().is_empty() {
        return Err(AppError::Validation("Species is required".to_string()));
    }

    let pet = state.repo.create_pet(&request).await?;
    created(pet)
}

/// PATCH /api/pets/:id - Update a pet listing.
pub async fn update_pet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdatePetRequest>,
) -> ApiResult<Pet> {
    let pet = state
        .repo
        .get_pet(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pet {} not found", id)))?;

    let guard = state.repo.shelter_guard(&pet.shelter_id, ANY_STAFF).await?;
    guard.assert(&user)?;

    let pet = state.repo.update_pet(&id, &request).await?;
    success(pet)
}

/// DELETE /api/pets/:id - Remove a pet listing.
pub async fn delete_pet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let pet = state
        .repo
        .get_pet(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pet {} not found", id)))?;

    let guard = state.repo.shelter_guard(&pet.shelter_id, MANAGER_UP).await?;
    guard.assert(&user)?;

    state.repo.delete_pet(&id).await?;
    success(())
}
