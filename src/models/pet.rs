//! Adoptable pet model.

use serde::{Deserialize, Serialize};

/// Adoption availability of a pet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PetStatus {
    Available,
    Pending,
    Adopted,
    Inactive,
}

impl PetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetStatus::Available => "available",
            PetStatus::Pending => "pending",
            PetStatus::Adopted => "adopted",
            PetStatus::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(PetStatus::Available),
            "pending" => Some(PetStatus::Pending),
            "adopted" => Some(PetStatus::Adopted),
            "inactive" => Some(PetStatus::Inactive),
            _ => None,
        }
    }
}

/// Rough size class of a pet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PetSize {
    Small,
    Medium,
    Large,
}

impl PetSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetSize::Small => "small",
            PetSize::Medium => "medium",
            PetSize::Large => "large",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "small" => Some(PetSize::Small),
            "medium" => Some(PetSize::Medium),
            "large" => Some(PetSize::Large),
            _ => None,
        }
    }
}

/// An adoptable animal, owned by a shelter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub shelter_id: String,
    pub name: String,
    pub species: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_months: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<PetSize>,
    pub vaccinated: bool,
    pub spayed: bool,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: PetStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for listing a new pet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetRequest {
    pub shelter_id: String,
    pub name: String,
    pub species: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age_months: Option<i64>,
    #[serde(default)]
    pub size: Option<PetSize>,
    #[serde(default)]
    pub vaccinated: bool,
    #[serde(default)]
    pub spayed: bool,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for updating a pet listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePetRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age_months: Option<i64>,
    #[serde(default)]
    pub size: Option<PetSize>,
    #[serde(default)]
    pub vaccinated: Option<bool>,
    #[serde(default)]
    pub spayed: Option<bool>,
    #[serde(default)]
    pub photo_urls: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<PetStatus>,
}
