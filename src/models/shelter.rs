//! Shelter organization model and membership roles.

use serde::{Deserialize, Serialize};

/// Moderation status of a shelter account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShelterStatus {
    PendingReview,
    Verified,
    Rejected,
}

impl ShelterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShelterStatus::PendingReview => "pending_review",
            ShelterStatus::Verified => "verified",
            ShelterStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending_review" => Some(ShelterStatus::PendingReview),
            "verified" => Some(ShelterStatus::Verified),
            "rejected" => Some(ShelterStatus::Rejected),
            _ => None,
        }
    }
}

/// Role of a user within a shelter. One vocabulary for the whole codebase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShelterRole {
    Owner,
    Manager,
    Staff,
}

impl ShelterRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShelterRole::Owner => "owner",
            ShelterRole::Manager => "manager",
            ShelterRole::Staff => "staff",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(ShelterRole::Owner),
            "manager" => Some(ShelterRole::Manager),
            "staff" => Some(ShelterRole::Staff),
            _ => None,
        }
    }
}

/// A membership entry: which user holds which role in a shelter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterMember {
    pub user_id: String,
    pub role: ShelterRole,
    pub joined_at: String,
}

/// A shelter organization account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelter {
    pub id: String,
    pub name: String,
    pub contact_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ShelterStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Membership entry joined with the member's account details, for listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterMemberView {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: ShelterRole,
    pub joined_at: String,
}

/// Request body for applying as a shelter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShelterRequest {
    pub name: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for updating a shelter profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShelterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for admin moderation of a shelter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShelterStatusRequest {
    pub status: String,
}
