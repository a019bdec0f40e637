//! Vet booking model.

use serde::{Deserialize, Serialize};

/// State of a vet booking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Booked,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "booked" => Some(BookingStatus::Booked),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// A reserved vet appointment slot. A (vet, slot) pair can hold at most one
/// active booking; the losing concurrent writer observes Conflict.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VetBooking {
    pub id: String,
    pub vet_name: String,
    /// RFC 3339 start of the appointment slot.
    pub slot_at: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<String>,
    pub status: BookingStatus,
    pub created_at: String,
}

/// Request body for booking a vet slot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub vet_name: String,
    pub slot_at: String,
    #[serde(default)]
    pub pet_id: Option<String>,
}
