//! Vet booking API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::DateTime;

use super::{created, success, ApiResult};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{CreateBookingRequest, UserRole, VetBooking};
use crate::AppState;

/// POST /api/bookings - Book a vet slot. Exactly one of two concurrent
/// requests for the same (vet, slot) succeeds; the other receives Conflict.
pub async fn create_booking(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateBookingRequest>,
) -> ApiResult<VetBooking> {
    if request.vet_name.trim().is_empty() {
        return Err(AppError::Validation("Vet name is required".to_string()));
    }

    // Normalize so equal instants in different notations collide
    let slot_at = DateTime::parse_from_rfc3339(&request.slot_at)
        .map_err(|_| AppError::Validation("slotAt must be an RFC 3339 timestamp".to_string()))?
        .to_utc()
        .to_rfc3339();

    let request = CreateBookingRequest { slot_at, ..request };
    let booking = state.repo.create_booking(&user.id, &request).await?;
    created(booking)
}

/// GET /api/bookings - List the caller's bookings.
pub async fn list_bookings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Vec<VetBooking>> {
    let bookings = state.repo.list_user_bookings(&user.id).await?;
    success(bookings)
}

/// DELETE /api/bookings/:id - Cancel a booking, freeing its slot.
pub async fn cancel_booking(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let booking = state
        .repo
        .get_booking(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

    if booking.user_id != user.id && user.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "Bookings can only be cancelled by their owner".to_string(),
        ));
    }

    state.repo.cancel_booking(&id).await?;
    success(())
}
