//! Shelter invite model.
//!
//! An invite is a single-use, time-limited credential granting a role within a
//! shelter upon acceptance. Only the SHA-256 hash of the token is ever stored.

use serde::{Deserialize, Serialize};

use super::ShelterRole;

/// Lifecycle state of an invite. `pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Revoked,
    Expired,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "pending",
            InviteStatus::Accepted => "accepted",
            InviteStatus::Revoked => "revoked",
            InviteStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InviteStatus::Pending),
            "accepted" => Some(InviteStatus::Accepted),
            "revoked" => Some(InviteStatus::Revoked),
            "expired" => Some(InviteStatus::Expired),
            _ => None,
        }
    }
}

/// A shelter invitation. The raw token exists only in the creation response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterInvite {
    pub id: String,
    pub shelter_id: String,
    pub email: String,
    pub role: ShelterRole,
    pub status: InviteStatus,
    pub invited_by: String,
    pub expires_at: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for inviting a user to a shelter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInviteRequest {
    pub email: String,
    pub role: String,
    /// Lifetime override in minutes; the configured default applies if absent.
    #[serde(default)]
    pub ttl_minutes: Option<i64>,
}

/// Response body for invite creation: the invite plus the one-time raw token
/// handed to the mail collaborator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteCreated {
    pub invite: ShelterInvite,
    pub token: String,
}

/// Result of probing an invite token's status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelter_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ShelterRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl InviteValidation {
    pub fn invalid(reason: &str) -> Self {
        Self {
            valid: false,
            reason: Some(reason.to_string()),
            shelter_id: None,
            shelter_name: None,
            role: None,
            email: None,
        }
    }
}
