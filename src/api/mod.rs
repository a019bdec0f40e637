//! REST API module.
//!
//! Thin per-resource handlers: extraction, validation, repository calls, and
//! envelope mapping. Domain failures bubble up as `AppError` and are turned
//! into HTTP responses at this boundary only.

mod adoptions;
mod bookings;
mod campaigns;
mod invites;
mod pets;
mod shelters;
mod users;

pub use adoptions::*;
pub use bookings::*;
pub use campaigns::*;
pub use invites::*;
pub use pets::*;
pub use shelters::*;
pub use users::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse {
        success: true,
        data,
        status: StatusCode::OK,
    })
}

/// Create a successful API response for a newly created resource.
pub fn created<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse {
        success: true,
        data,
        status: StatusCode::CREATED,
    })
}

/// Maximum page size of any listing.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default page size when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Normalize pagination parameters: page is 1-based, pageSize is clamped.
pub fn clamp_paging(page: Option<i64>, page_size: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_paging_defaults() {
        assert_eq!(clamp_paging(None, None), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_clamp_paging_bounds() {
        assert_eq!(clamp_paging(Some(0), Some(0)), (1, 1));
        assert_eq!(clamp_paging(Some(-3), Some(10_000)), (1, MAX_PAGE_SIZE));
        assert_eq!(clamp_paging(Some(4), Some(50)), (4, 50));
    }
}
