//! Launch sequencer flow tests against a mock ads platform.

use adlaunch_core::types::{AdPlan, EntityInfo, EntityStatus, LaunchRequest, MediaRef};
use adlaunch_core::{LaunchError, LaunchResult};
use adlaunch_meta::{AdSetParams, AdsApi, CreativeParams, LaunchSequencer};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;

/// One recorded platform call, enough to assert ordering and id chaining.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Campaign {
        name: String,
        objective: String,
        status: EntityStatus,
    },
    AdSet {
        campaign_id: String,
        optimization_goal: String,
        billing_event: String,
        status: EntityStatus,
    },
    Creative {
        page_id: String,
        image_hash: Option<String>,
        video_id: Option<String>,
    },
    Ad {
        adset_id: String,
        creative_id: String,
        status: EntityStatus,
    },
}

#[derive(Default)]
struct MockAdsApi {
    calls: Mutex<Vec<Call>>,
    fail_ad_set: bool,
}

impl MockAdsApi {
    fn failing_at_ad_set() -> Self {
        Self {
            fail_ad_set: true,
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdsApi for MockAdsApi {
    async fn upload_image(&self, _: Vec<u8>, _: &str, _: &str) -> LaunchResult<String> {
        Ok("imghash".into())
    }

    async fn upload_video(&self, _: Vec<u8>, _: &str, _: &str) -> LaunchResult<String> {
        Ok("vid-1".into())
    }

    async fn create_campaign(
        &self,
        name: &str,
        outcome_objective: &str,
        status: EntityStatus,
    ) -> LaunchResult<String> {
        self.calls.lock().unwrap().push(Call::Campaign {
            name: name.into(),
            objective: outcome_objective.into(),
            status,
        });
        Ok("camp-1".into())
    }

    async fn create_ad_set(&self, params: &AdSetParams) -> LaunchResult<String> {
        self.calls.lock().unwrap().push(Call::AdSet {
            campaign_id: params.campaign_id.clone(),
            optimization_goal: params.optimization_goal.clone(),
            billing_event: params.billing_event.clone(),
            status: params.status,
        });
        if self.fail_ad_set {
            return Err(LaunchError::remote(
                400,
                "(#2446386) budget too low for this billing event",
            ));
        }
        Ok("adset-1".into())
    }

    async fn create_creative_with_link(
        &self,
        params: &CreativeParams,
    ) -> LaunchResult<String> {
        self.calls.lock().unwrap().push(Call::Creative {
            page_id: params.page_id.clone(),
            image_hash: params.image_hash.clone(),
            video_id: params.video_id.clone(),
        });
        Ok("creative-1".into())
    }

    async fn create_ad(
        &self,
        adset_id: &str,
        creative_id: &str,
        _name: &str,
        status: EntityStatus,
    ) -> LaunchResult<String> {
        self.calls.lock().unwrap().push(Call::Ad {
            adset_id: adset_id.into(),
            creative_id: creative_id.into(),
            status,
        });
        Ok("ad-1".into())
    }

    async fn set_ad_status(&self, _: &str, _: EntityStatus) -> LaunchResult<()> {
        Ok(())
    }

    async fn entity_status(&self, id: &str) -> LaunchResult<EntityInfo> {
        Ok(EntityInfo {
            id: id.into(),
            name: None,
            status: Some("PAUSED".into()),
        })
    }
}

fn sample_request() -> LaunchRequest {
    LaunchRequest {
        plan: AdPlan {
            campaign_name: "Yoga Promo".into(),
            objective: "LEAD_GENERATION".into(),
            message: "Join now".into(),
            website_url: Some("https://example.com".into()),
            budget_daily: 500.0,
            min_age: 21,
            max_age: 55,
            countries: vec!["IN".into()],
            genders: None,
            interests: None,
        },
        media: None,
        activate: false,
    }
}

#[tokio::test]
async fn test_happy_path_creates_four_chained_resources() {
    let api = Arc::new(MockAdsApi::default());
    let sequencer = LaunchSequencer::new(api.clone(), "page-9");

    let ids = sequencer.launch(&sample_request()).await.unwrap();

    assert_eq!(ids.campaign_id, "camp-1");
    assert_eq!(ids.adset_id, "adset-1");
    assert_eq!(ids.creative_id, "creative-1");
    assert_eq!(ids.ad_id, "ad-1");

    let calls = api.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(
        calls[0],
        Call::Campaign {
            name: "Yoga Promo".into(),
            objective: "OUTCOME_LEADS".into(),
            status: EntityStatus::Paused,
        }
    );
    // Ad set chains the campaign id and derives delivery from the raw objective.
    assert_eq!(
        calls[1],
        Call::AdSet {
            campaign_id: "camp-1".into(),
            optimization_goal: "LEAD_GENERATION".into(),
            billing_event: "IMPRESSIONS".into(),
            status: EntityStatus::Paused,
        }
    );
    assert_eq!(
        calls[2],
        Call::Creative {
            page_id: "page-9".into(),
            image_hash: None,
            video_id: None,
        }
    );
    assert_eq!(
        calls[3],
        Call::Ad {
            adset_id: "adset-1".into(),
            creative_id: "creative-1".into(),
            status: EntityStatus::Paused,
        }
    );
}

#[tokio::test]
async fn test_non_lead_objective_bills_on_link_clicks_and_activates() {
    let api = Arc::new(MockAdsApi::default());
    let sequencer = LaunchSequencer::new(api.clone(), "page-9");

    let mut request = sample_request();
    request.plan.objective = "AWARENESS".into();
    request.activate = true;
    sequencer.launch(&request).await.unwrap();

    let calls = api.calls();
    assert_eq!(
        calls[0],
        Call::Campaign {
            name: "Yoga Promo".into(),
            objective: "OUTCOME_AWARENESS".into(),
            status: EntityStatus::Active,
        }
    );
    assert_eq!(
        calls[1],
        Call::AdSet {
            campaign_id: "camp-1".into(),
            optimization_goal: "LINK_CLICKS".into(),
            billing_event: "LINK_CLICKS".into(),
            status: EntityStatus::Active,
        }
    );
}

#[tokio::test]
async fn test_media_refs_flow_into_creative() {
    let api = Arc::new(MockAdsApi::default());
    let sequencer = LaunchSequencer::new(api.clone(), "page-9");

    let mut request = sample_request();
    request.media = Some(MediaRef {
        image_hash: Some("imghash".into()),
        video_id: Some("vid-1".into()),
    });
    sequencer.launch(&request).await.unwrap();

    assert_eq!(
        api.calls()[2],
        Call::Creative {
            page_id: "page-9".into(),
            image_hash: Some("imghash".into()),
            video_id: Some("vid-1".into()),
        }
    );
}

#[tokio::test]
async fn test_ad_set_failure_aborts_without_rollback() {
    let api = Arc::new(MockAdsApi::failing_at_ad_set());
    let sequencer = LaunchSequencer::new(api.clone(), "page-9");

    let err = sequencer.launch(&sample_request()).await.unwrap_err();
    match err {
        LaunchError::RemoteApi { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("budget too low"));
        }
        other => panic!("expected RemoteApi error, got {other:?}"),
    }

    // Campaign was created and stays created; creative and ad never attempted.
    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], Call::Campaign { .. }));
    assert!(matches!(calls[1], Call::AdSet { .. }));
}

#[tokio::test]
async fn test_invalid_plan_is_rejected_before_any_platform_call() {
    let api = Arc::new(MockAdsApi::default());
    let sequencer = LaunchSequencer::new(api.clone(), "page-9");

    let mut request = sample_request();
    request.plan.countries.clear();
    let err = sequencer.launch(&request).await.unwrap_err();

    assert!(matches!(err, LaunchError::Validation(_)));
    assert!(api.calls().is_empty());
}
