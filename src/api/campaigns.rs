//! Fundraising campaign API endpoints. Browsing and donating are public.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{created, success, ApiResult};
use crate::auth::{CurrentUser, MANAGER_UP};
use crate::errors::AppError;
use crate::models::{
    Campaign, CampaignStatus, CreateCampaignRequest, DonateRequest, UpdateCampaignStatusRequest,
    UserRole,
};
use crate::AppState;

/// Campaign listing query parameters.
#[derive(Debug, Deserialize)]
pub struct CampaignListQuery {
    #[serde(default)]
    pub status: Option<String>,
}

/// GET /api/campaigns - List campaigns.
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(params): Query<CampaignListQuery>,
) -> ApiResult<Vec<Campaign>> {
    let status = match params.status.as_deref() {
        Some(s) => Some(
            CampaignStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("Unknown campaign status: {}", s)))?,
        ),
        None => None,
    };

    let campaigns = state.repo.list_campaigns(status).await?;
    success(campaigns)
}

/// GET /api/campaigns/:id - Get a campaign with its participants.
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Campaign> {
    match state.repo.get_campaign(&id).await? {
        Some(campaign) => success(campaign),
        None => Err(AppError::NotFound(format!("Campaign {} not found", id))),
    }
}

/// POST /api/campaigns - Start a campaign for a pet.
pub async fn create_campaign(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateCampaignRequest>,
) -> ApiResult<Campaign> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if request.goal_cents <= 0 {
        return Err(AppError::Validation(
            "goalCents must be positive".to_string(),
        ));
    }

    let pet = state
        .repo
        .get_pet(&request.pet_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pet {} not found", request.pet_id)))?;

    let guard = state.repo.shelter_guard(&pet.shelter_id, MANAGER_UP).await?;
    guard.assert(&user)?;

    let campaign = state.repo.create_campaign(&request).await?;
    created(campaign)
}

/// POST /api/campaigns/:id/donations - Public donation to a campaign.
pub async fn donate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<DonateRequest>,
) -> ApiResult<Campaign> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if !request.email.contains('@') {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    if request.amount_cents <= 0 {
        return Err(AppError::Validation(
            "amountCents must be positive".to_string(),
        ));
    }

    let campaign = state.repo.donate(&id, &request).await?;
    created(campaign)
}

/// PATCH /api/campaigns/:id - Close or cancel a campaign.
pub async fn set_campaign_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateCampaignStatusRequest>,
) -> ApiResult<Campaign> {
    let status = CampaignStatus::parse(&request.status).ok_or_else(|| {
        AppError::Validation(format!("Unknown campaign status: {}", request.status))
    })?;

    let campaign = state
        .repo
        .get_campaign(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Campaign {} not found", id)))?;

    if user.role != UserRole::Admin {
        let pet = state
            .repo
            .get_pet(&campaign.pet_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pet {} not found", campaign.pet_id)))?;
        let guard = state.repo.shelter_guard(&pet.shelter_id, MANAGER_UP).await?;
        guard.assert(&user)?;
    }

    let campaign = state.repo.set_campaign_status(&id, status).await?;
    success(campaign)
}
