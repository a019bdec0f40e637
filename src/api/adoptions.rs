//! Adoption request API endpoints.
//!
//! Submission is public; everything else is gated on shelter membership or
//! the platform admin role.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{clamp_paging, created, success, ApiResult};
use crate::auth::{CurrentUser, ANY_STAFF, MANAGER_UP};
use crate::errors::AppError;
use crate::models::{
    AdoptionRequest, AdoptionStatus, Page, SubmitAdoptionRequest, TransitionAdoptionRequest, User,
    UserRole,
};
use crate::AppState;

/// Adoption request listing query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionListQuery {
    #[serde(default)]
    pub shelter_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub pet_id: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

/// POST /api/adoption-requests - Public submission of an adoption request.
pub async fn submit_adoption(
    State(state): State<AppState>,
    Json(request): Json<SubmitAdoptionRequest>,
) -> ApiResult<AdoptionRequest> {
    if request.full_name.trim().is_empty() {
        return Err(AppError::Validation("Full name is required".to_string()));
    }
    if !request.email.contains('@') {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    if request.phone.trim().is_empty() {
        return Err(AppError::Validation("Phone is required".to_string()));
    }

    let adoption = state.repo.submit_adoption(&request).await?;

    if let Err(e) = state.search.index_request(&adoption).await {
        tracing::warn!("Failed to index adoption request: {}", e);
    }

    created(adoption)
}

/// GET /api/adoption-requests - Staff listing with filters, free-text search
/// and pagination.
pub async fn list_adoptions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<AdoptionListQuery>,
) -> ApiResult<Page<AdoptionRequest>> {
    let status = match params.status.as_deref() {
        Some(s) => Some(
            AdoptionStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("Unknown adoption status: {}", s)))?,
        ),
        None => None,
    };
    let (page, page_size) = clamp_paging(params.page, params.page_size);

    // Admins may list across shelters; staff are scoped to one they belong to
    let shelter_filter = if user.role == UserRole::Admin {
        params.shelter_id.clone()
    } else {
        let shelter_id = params
            .shelter_id
            .clone()
            .ok_or_else(|| AppError::Validation("shelterId is required".to_string()))?;
        let guard = state.repo.shelter_guard(&shelter_id, ANY_STAFF).await?;
        guard.assert(&user)?;
        Some(shelter_id)
    };

    let q = params.q.as_deref().filter(|q| !q.trim().is_empty());
    let result = match q {
        Some(q) => {
            let hits = state.search.search(
                q,
                page_size as usize,
                ((page - 1) * page_size) as usize,
            )?;
            let ids: Vec<String> = hits.into_iter().map(|h| h.request_id).collect();
            let items: Vec<AdoptionRequest> = state
                .repo
                .get_adoptions_by_ids(&ids)
                .await?
                .into_iter()
                .filter(|r| {
                    shelter_filter
                        .as_deref()
                        .map(|s| r.shelter_id == s)
                        .unwrap_or(true)
                })
                .filter(|r| status.map(|s| r.status == s).unwrap_or(true))
                .filter(|r| {
                    params
                        .pet_id
                        .as_deref()
                        .map(|p| r.pet_id == p)
                        .unwrap_or(true)
                })
                .collect();
            let total = items.len() as i64;
            Page {
                items,
                total,
                page,
                page_size,
            }
        }
        None => {
            state
                .repo
                .list_adoptions(
                    shelter_filter.as_deref(),
                    status,
                    params.pet_id.as_deref(),
                    page,
                    page_size,
                )
                .await?
        }
    };

    success(result)
}

/// GET /api/adoption-requests/:id - Get a single adoption request.
pub async fn get_adoption(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<AdoptionRequest> {
    let adoption = state
        .repo
        .get_adoption(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Adoption request {} not found", id)))?;

    if user.role != UserRole::Admin {
        let guard = state.repo.shelter_guard(&adoption.shelter_id, ANY_STAFF).await?;
        guard.assert(&user)?;
    }

    success(adoption)
}

/// PATCH /api/adoption-requests/:id - Move a request through the review
/// workflow. Decisions require manager or owner; taking a request under
/// review is open to any staff.
pub async fn transition_adoption(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<TransitionAdoptionRequest>,
) -> ApiResult<AdoptionRequest> {
    let existing = state
        .repo
        .get_adoption(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Adoption request {} not found", id)))?;

    let new_status = AdoptionStatus::parse(&request.status).ok_or_else(|| {
        AppError::Validation(format!("Unknown adoption status: {}", request.status))
    })?;

    let allowed = if new_status == AdoptionStatus::UnderReview {
        ANY_STAFF
    } else {
        MANAGER_UP
    };
    let guard = state.repo.shelter_guard(&existing.shelter_id, allowed).await?;
    guard.assert(&user)?;

    let adoption = state
        .repo
        .transition_adoption(&id, new_status, request.notes.as_deref())
        .await?;

    success(adoption)
}

/// DELETE /api/adoption-requests/:id - Withdraw a request. Permitted for the
/// applicant (matched by account email), shelter staff and admins.
pub async fn cancel_adoption(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let adoption = state
        .repo
        .get_adoption(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Adoption request {} not found", id)))?;

    if !may_cancel(&user, &adoption) {
        let guard = state.repo.shelter_guard(&adoption.shelter_id, ANY_STAFF).await?;
        guard.assert(&user)?;
    }

    state.repo.delete_adoption(&id).await?;

    if let Err(e) = state.search.remove_request(&id).await {
        tracing::warn!("Failed to remove adoption request from index: {}", e);
    }

    success(())
}

fn may_cancel(user: &User, adoption: &AdoptionRequest) -> bool {
    user.role == UserRole::Admin || adoption.email.eq_ignore_ascii_case(&user.email)
}
