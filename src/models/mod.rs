//! Data models for the PawHaven adoption platform.
//!
//! Domain types plus the request/response bodies of the JSON API.

mod adoption;
mod booking;
mod campaign;
mod invite;
mod pet;
mod shelter;
mod user;

pub use adoption::*;
pub use booking::*;
pub use campaign::*;
pub use invite::*;
pub use pet::*;
pub use shelter::*;
pub use user::*;

use serde::Serialize;

/// One page of a listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}
