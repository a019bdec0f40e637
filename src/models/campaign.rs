//! Fundraising campaign model.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a campaign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Active,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(CampaignStatus::Active),
            "completed" => Some(CampaignStatus::Completed),
            "cancelled" => Some(CampaignStatus::Cancelled),
            _ => None,
        }
    }
}

/// One donation event within a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignParticipant {
    pub name: String,
    pub email: String,
    pub amount_cents: i64,
    pub donated_at: String,
}

/// A fundraising drive tied to a pet. `raised_cents` is incremented in the
/// same transaction as the participant insert, so the two cannot drift.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub pet_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub goal_cents: i64,
    pub raised_cents: i64,
    pub status: CampaignStatus,
    pub participants: Vec<CampaignParticipant>,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for starting a campaign.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub pet_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub goal_cents: i64,
}

/// Public request body for donating to a campaign.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonateRequest {
    pub name: String,
    pub email: String,
    pub amount_cents: i64,
}

/// Request body for closing or cancelling a campaign.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignStatusRequest {
    pub status: String,
}
