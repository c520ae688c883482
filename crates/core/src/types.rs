use serde::{Deserialize, Serialize};

use crate::error::{LaunchError, LaunchResult};

/// Advertising campaign plan, produced by the AI plan generator and
/// edited by the user before launch. Lives for one session only; the
/// platform holds the authoritative copy of everything created from it.
///
/// `objective` stays a plain string: the four business objectives below
/// are the expected values, but unknown strings are forwarded to the
/// platform untouched (it rejects invalid ones itself).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdPlan {
    pub campaign_name: String,
    pub objective: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    pub budget_daily: f64,
    pub min_age: u32,
    pub max_age: u32,
    pub countries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genders: Option<Vec<Gender>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

impl AdPlan {
    /// Boundary validation before a launch is attempted. Invariants the
    /// remote platform would reject anyway, caught here with a clearer
    /// message and before any resource is created.
    pub fn validate(&self) -> LaunchResult<()> {
        if self.campaign_name.trim().is_empty() {
            return Err(LaunchError::Validation(
                "campaignName must not be empty".into(),
            ));
        }
        if self.countries.is_empty() {
            return Err(LaunchError::Validation(
                "countries must contain at least one ISO code".into(),
            ));
        }
        if self.budget_daily <= 0.0 {
            return Err(LaunchError::Validation(
                "budgetDaily must be positive".into(),
            ));
        }
        if self.max_age < self.min_age {
            return Err(LaunchError::Validation(
                "maxAge must be >= minAge".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Uploaded media reference consumed by creative creation. At most one
/// of the two fields is meaningful per launch, but both may be set; the
/// platform decides whether it accepts the combination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

/// Ids of the four remote resources created by one launch. Never reused;
/// every launch creates four fresh resources on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedIds {
    pub campaign_id: String,
    pub adset_id: String,
    pub creative_id: String,
    pub ad_id: String,
}

/// Delivery status for campaigns, ad sets, and ads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityStatus {
    Active,
    Paused,
}

impl EntityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Active => "ACTIVE",
            EntityStatus::Paused => "PAUSED",
        }
    }

    /// PAUSED unless the caller explicitly activated the launch.
    pub fn from_activate(activate: bool) -> Self {
        if activate {
            EntityStatus::Active
        } else {
            EntityStatus::Paused
        }
    }
}

/// Full launch payload: a plan plus optional media and the activation flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    #[serde(flatten)]
    pub plan: AdPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,
    #[serde(default)]
    pub activate: bool,
}

/// Fields returned by the platform's status read endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
