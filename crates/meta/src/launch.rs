//! Four-step launch sequencer: campaign -> ad set -> creative -> ad.
//!
//! Strictly sequential; each step runs only if the previous one succeeded.
//! There is no compensating rollback: a failure part-way through leaves the
//! already-created resources on the platform (paused unless activated), and
//! the caller receives only the failing step's error. Re-running a launch
//! always creates four fresh resources.

use adlaunch_core::types::{CreatedIds, EntityStatus, LaunchRequest};
use adlaunch_core::LaunchResult;
use std::sync::Arc;
use tracing::info;

use crate::graph::{AdSetParams, AdsApi, CreativeParams};
use crate::objective;

pub struct LaunchSequencer {
    api: Arc<dyn AdsApi>,
    page_id: String,
}

impl LaunchSequencer {
    pub fn new(api: Arc<dyn AdsApi>, page_id: impl Into<String>) -> Self {
        Self {
            api,
            page_id: page_id.into(),
        }
    }

    /// Run the full launch sequence, returning the four created ids.
    pub async fn launch(&self, request: &LaunchRequest) -> LaunchResult<CreatedIds> {
        request.plan.validate()?;

        let plan = &request.plan;
        let media = request.media.clone().unwrap_or_default();
        let status = EntityStatus::from_activate(request.activate);
        let outcome_objective = objective::map_to_outcome_objective(&plan.objective);

        info!(
            campaign = %plan.campaign_name,
            objective = outcome_objective,
            status = status.as_str(),
            "Launch step 1/4: campaign"
        );
        let campaign_id = self
            .api
            .create_campaign(&plan.campaign_name, outcome_objective, status)
            .await?;

        // Delivery parameters derive from the raw objective, not the mapped one.
        let delivery = objective::delivery_spec(&plan.objective);
        info!(campaign_id = %campaign_id, "Launch step 2/4: ad set");
        let adset_id = self
            .api
            .create_ad_set(&AdSetParams {
                campaign_id: campaign_id.clone(),
                name: format!("{} - Set", plan.campaign_name),
                budget_daily: plan.budget_daily,
                countries: plan.countries.clone(),
                min_age: plan.min_age,
                max_age: plan.max_age,
                optimization_goal: delivery.optimization_goal.to_string(),
                billing_event: delivery.billing_event.to_string(),
                status,
            })
            .await?;

        info!(adset_id = %adset_id, "Launch step 3/4: creative");
        let creative_id = self
            .api
            .create_creative_with_link(&CreativeParams {
                page_id: self.page_id.clone(),
                message: plan.message.clone(),
                website_url: plan.website_url.clone(),
                image_hash: media.image_hash,
                video_id: media.video_id,
            })
            .await?;

        info!(creative_id = %creative_id, "Launch step 4/4: ad");
        let ad_id = self
            .api
            .create_ad(
                &adset_id,
                &creative_id,
                &format!("{} - Ad", plan.campaign_name),
                status,
            )
            .await?;

        metrics::counter!("launch.completed").increment(1);
        info!(
            campaign_id = %campaign_id,
            adset_id = %adset_id,
            creative_id = %creative_id,
            ad_id = %ad_id,
            "Launch complete"
        );

        Ok(CreatedIds {
            campaign_id,
            adset_id,
            creative_id,
            ad_id,
        })
    }
}
