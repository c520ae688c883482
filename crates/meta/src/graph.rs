//! Thin authenticated client for the Meta Marketing (Graph) API.
//!
//! Every call appends the static access token as a query parameter; write
//! calls use form-encoded bodies, uploads use multipart. Any non-2xx
//! response surfaces immediately as `LaunchError::RemoteApi` carrying the
//! status and raw body text. Nothing is retried at this layer.

use adlaunch_core::config::MetaConfig;
use adlaunch_core::types::{EntityInfo, EntityStatus};
use adlaunch_core::{LaunchError, LaunchResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const GRAPH_BASE: &str = "https://graph.facebook.com";

/// Ads platform operations the launch sequencer and REST surface depend
/// on. Implemented by [`GraphClient`] for production and by mocks in tests.
#[async_trait]
pub trait AdsApi: Send + Sync {
    async fn upload_image(&self, bytes: Vec<u8>, filename: &str, mime: &str)
        -> LaunchResult<String>;

    async fn upload_video(&self, bytes: Vec<u8>, filename: &str, mime: &str)
        -> LaunchResult<String>;

    async fn create_campaign(
        &self,
        name: &str,
        outcome_objective: &str,
        status: EntityStatus,
    ) -> LaunchResult<String>;

    async fn create_ad_set(&self, params: &AdSetParams) -> LaunchResult<String>;

    async fn create_creative_with_link(&self, params: &CreativeParams)
        -> LaunchResult<String>;

    async fn create_ad(
        &self,
        adset_id: &str,
        creative_id: &str,
        name: &str,
        status: EntityStatus,
    ) -> LaunchResult<String>;

    async fn set_ad_status(&self, ad_id: &str, status: EntityStatus) -> LaunchResult<()>;

    async fn entity_status(&self, id: &str) -> LaunchResult<EntityInfo>;
}

/// Parameters for ad-set creation.
#[derive(Debug, Clone)]
pub struct AdSetParams {
    pub campaign_id: String,
    pub name: String,
    /// Daily budget in currency units; converted to minor units on the wire.
    pub budget_daily: f64,
    pub countries: Vec<String>,
    pub min_age: u32,
    pub max_age: u32,
    pub optimization_goal: String,
    pub billing_event: String,
    pub status: EntityStatus,
}

/// Parameters for link-creative creation. `image_hash` and `video_id` may
/// both be present; the platform decides whether it accepts the combination.
#[derive(Debug, Clone)]
pub struct CreativeParams {
    pub page_id: String,
    pub message: String,
    pub website_url: Option<String>,
    pub image_hash: Option<String>,
    pub video_id: Option<String>,
}

/// Budget conversion from currency units to the platform's integer minor
/// units, e.g. 500.00 -> 50000.
pub fn to_minor_units(budget_daily: f64) -> i64 {
    (budget_daily * 100.0).round() as i64
}

/// Targeting spec sent with every ad set. Platform-side automatic audience
/// expansion is always disabled.
fn targeting_spec(countries: &[String], min_age: u32, max_age: u32) -> Value {
    json!({
        "geo_locations": { "countries": countries },
        "age_min": min_age,
        "age_max": max_age,
        "targeting_automation": { "advantage_audience": 0 },
    })
}

pub struct GraphClient {
    http: reqwest::Client,
    config: MetaConfig,
}

impl GraphClient {
    pub fn new(config: MetaConfig) -> LaunchResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}{}", GRAPH_BASE, self.config.graph_version, path)
    }

    fn account_path(&self, resource: &str) -> String {
        format!("/act_{}/{}", self.config.ad_account_id, resource)
    }

    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> LaunchResult<Value> {
        let response = self
            .http
            .post(self.url(path))
            .query(&[("access_token", self.config.access_token.as_str())])
            .form(form)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn post_multipart(&self, path: &str, form: Form) -> LaunchResult<Value> {
        let response = self
            .http
            .post(self.url(path))
            .query(&[("access_token", self.config.access_token.as_str())])
            .multipart(form)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> LaunchResult<Value> {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .query(&[("access_token", self.config.access_token.as_str())])
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> LaunchResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LaunchError::remote(status.as_u16(), body));
        }
        Ok(response.json().await?)
    }

    fn id_from(data: &Value, context: &str) -> LaunchResult<String> {
        data.get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                LaunchError::Internal(anyhow::anyhow!(
                    "{context} response missing 'id': {data}"
                ))
            })
    }

    fn file_part(bytes: Vec<u8>, filename: &str, mime: &str) -> LaunchResult<Part> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime)?;
        Ok(part)
    }
}

#[async_trait]
impl AdsApi for GraphClient {
    /// Upload image bytes; returns the platform content hash.
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        mime: &str,
    ) -> LaunchResult<String> {
        debug!(filename, mime, size = bytes.len(), "Uploading image");
        let form = Form::new().part("source", Self::file_part(bytes, filename, mime)?);
        let data = self
            .post_multipart(&self.account_path("adimages"), form)
            .await?;
        data["images"][0]["hash"]
            .as_str()
            .or_else(|| data["hash"].as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                LaunchError::Internal(anyhow::anyhow!(
                    "image upload response missing hash: {data}"
                ))
            })
    }

    /// Upload video bytes; returns the platform-assigned video id.
    async fn upload_video(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        mime: &str,
    ) -> LaunchResult<String> {
        debug!(filename, mime, size = bytes.len(), "Uploading video");
        let form = Form::new().part("source", Self::file_part(bytes, filename, mime)?);
        let data = self
            .post_multipart(&self.account_path("advideos"), form)
            .await?;
        Self::id_from(&data, "video upload")
    }

    async fn create_campaign(
        &self,
        name: &str,
        outcome_objective: &str,
        status: EntityStatus,
    ) -> LaunchResult<String> {
        debug!(name, objective = outcome_objective, status = status.as_str(), "Creating campaign");
        // special_ad_categories is mandatory; NONE is the only safe default here.
        let form = [
            ("name", name.to_string()),
            ("objective", outcome_objective.to_string()),
            ("status", status.as_str().to_string()),
            ("buying_type", "AUCTION".to_string()),
            ("special_ad_categories", "[\"NONE\"]".to_string()),
        ];
        let data = self.post_form(&self.account_path("campaigns"), &form).await?;
        Self::id_from(&data, "campaign create")
    }

    async fn create_ad_set(&self, params: &AdSetParams) -> LaunchResult<String> {
        debug!(
            campaign_id = %params.campaign_id,
            name = %params.name,
            daily_budget = to_minor_units(params.budget_daily),
            "Creating ad set"
        );
        let targeting = targeting_spec(&params.countries, params.min_age, params.max_age);
        let form = [
            ("name", params.name.clone()),
            ("campaign_id", params.campaign_id.clone()),
            ("daily_budget", to_minor_units(params.budget_daily).to_string()),
            ("targeting", serde_json::to_string(&targeting)?),
            ("optimization_goal", params.optimization_goal.clone()),
            ("billing_event", params.billing_event.clone()),
            // No bid_amount supported; lowest cost without a cap.
            ("bid_strategy", "LOWEST_COST_WITHOUT_CAP".to_string()),
            (
                "promoted_object",
                serde_json::to_string(&json!({ "page_id": self.config.page_id }))?,
            ),
            ("status", params.status.as_str().to_string()),
        ];
        let data = self.post_form(&self.account_path("adsets"), &form).await?;
        Self::id_from(&data, "ad set create")
    }

    async fn create_creative_with_link(
        &self,
        params: &CreativeParams,
    ) -> LaunchResult<String> {
        debug!(
            page_id = %params.page_id,
            has_image = params.image_hash.is_some(),
            has_video = params.video_id.is_some(),
            "Creating creative"
        );
        let mut link_data = json!({ "message": params.message });
        if let Some(url) = &params.website_url {
            link_data["link"] = json!(url);
        }
        if let Some(hash) = &params.image_hash {
            link_data["image_hash"] = json!(hash);
        }
        let mut story_spec = json!({
            "page_id": params.page_id,
            "link_data": link_data,
        });
        if let Some(video_id) = &params.video_id {
            story_spec["video_data"] = json!({
                "message": params.message,
                "video_id": video_id,
            });
        }
        let form = [
            (
                "name",
                format!("Creative - {}", chrono::Utc::now().to_rfc3339()),
            ),
            ("object_story_spec", serde_json::to_string(&story_spec)?),
        ];
        let data = self
            .post_form(&self.account_path("adcreatives"), &form)
            .await?;
        Self::id_from(&data, "creative create")
    }

    async fn create_ad(
        &self,
        adset_id: &str,
        creative_id: &str,
        name: &str,
        status: EntityStatus,
    ) -> LaunchResult<String> {
        debug!(adset_id, creative_id, name, "Creating ad");
        let form = [
            ("name", name.to_string()),
            ("adset_id", adset_id.to_string()),
            (
                "creative",
                serde_json::to_string(&json!({ "creative_id": creative_id }))?,
            ),
            ("status", status.as_str().to_string()),
        ];
        let data = self.post_form(&self.account_path("ads"), &form).await?;
        Self::id_from(&data, "ad create")
    }

    /// Fire-and-forget status transition on an existing ad.
    async fn set_ad_status(&self, ad_id: &str, status: EntityStatus) -> LaunchResult<()> {
        debug!(ad_id, status = status.as_str(), "Setting ad status");
        let form = [("status", status.as_str().to_string())];
        self.post_form(&format!("/{ad_id}"), &form).await?;
        Ok(())
    }

    /// Read id, name, and status of any remote resource.
    async fn entity_status(&self, id: &str) -> LaunchResult<EntityInfo> {
        let data = self
            .get(&format!("/{id}"), &[("fields", "id,name,status")])
            .await?;
        Ok(serde_json::from_value(data)?)
    }
}
