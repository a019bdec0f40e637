//! Adoption request model and its review state machine.

use serde::{Deserialize, Serialize};

/// Review state of an adoption request.
///
/// Transitions are forward-only:
/// pending -> under_review | approved | rejected,
/// under_review -> approved | rejected,
/// approved -> completed.
/// approved, rejected and completed never move again except as listed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdoptionStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Completed,
}

impl AdoptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionStatus::Pending => "pending",
            AdoptionStatus::UnderReview => "under_review",
            AdoptionStatus::Approved => "approved",
            AdoptionStatus::Rejected => "rejected",
            AdoptionStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AdoptionStatus::Pending),
            "under_review" => Some(AdoptionStatus::UnderReview),
            "approved" => Some(AdoptionStatus::Approved),
            "rejected" => Some(AdoptionStatus::Rejected),
            "completed" => Some(AdoptionStatus::Completed),
            _ => None,
        }
    }

    /// Whether moving from `self` to `next` is a legal forward transition.
    pub fn can_transition_to(&self, next: AdoptionStatus) -> bool {
        use AdoptionStatus::*;
        matches!(
            (self, next),
            (Pending, UnderReview)
                | (Pending, Approved)
                | (Pending, Rejected)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
                | (Approved, Completed)
        )
    }
}

/// An applicant's request to adopt a specific pet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionRequest {
    pub id: String,
    pub pet_id: String,
    /// Denormalized from the pet at submission time.
    pub shelter_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub household: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: AdoptionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Public request body for submitting an adoption request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAdoptionRequest {
    pub pet_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub household: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Request body for a staff decision on an adoption request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionAdoptionRequest {
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}
