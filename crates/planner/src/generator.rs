//! Azure OpenAI chat-completions client and plan defaulting policy.
//!
//! Single round trip, no retry. The model's JSON is taken mostly on trust:
//! the only corrections applied are the four defaulting rules (countries,
//! budget, age bounds). A structurally odd but parseable response passes
//! through and fails later at the platform boundary instead.

use adlaunch_core::config::{AzureOpenAiConfig, DefaultsConfig};
use adlaunch_core::types::{AdPlan, Gender};
use adlaunch_core::{LaunchError, LaunchResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const TEMPERATURE: f64 = 0.4;
const DEFAULT_BUDGET: f64 = 500.0;
const MIN_BUDGET: f64 = 100.0;
const DEFAULT_MIN_AGE: u32 = 21;
const DEFAULT_MAX_AGE: u32 = 55;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    temperature: f64,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// The model's JSON as-is: every field optional, unknown fields ignored.
/// Defaulting happens in [`plan_from_content`], nowhere else.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlan {
    campaign_name: Option<String>,
    objective: Option<String>,
    message: Option<String>,
    website_url: Option<String>,
    budget_daily: Option<f64>,
    min_age: Option<u32>,
    max_age: Option<u32>,
    countries: Option<Vec<String>>,
    genders: Option<Vec<Gender>>,
    interests: Option<Vec<String>>,
}

/// Parse completion content and apply the defaulting policy.
fn plan_from_content(content: &str, defaults: &DefaultsConfig) -> LaunchResult<AdPlan> {
    let raw: RawPlan = serde_json::from_str(content).map_err(|e| {
        LaunchError::PlanGeneration(format!("completion content is not valid JSON: {e}"))
    })?;

    let countries = match raw.countries {
        Some(countries) if !countries.is_empty() => countries,
        _ => vec![defaults.country.clone()],
    };

    Ok(AdPlan {
        campaign_name: raw.campaign_name.unwrap_or_default(),
        objective: raw.objective.unwrap_or_default(),
        message: raw.message.unwrap_or_default(),
        website_url: raw.website_url,
        budget_daily: raw
            .budget_daily
            .filter(|b| *b >= MIN_BUDGET)
            .unwrap_or(DEFAULT_BUDGET),
        min_age: raw.min_age.filter(|a| *a > 0).unwrap_or(DEFAULT_MIN_AGE),
        max_age: raw.max_age.filter(|a| *a > 0).unwrap_or(DEFAULT_MAX_AGE),
        countries,
        genders: raw.genders,
        interests: raw.interests,
    })
}

fn system_instruction(defaults: &DefaultsConfig) -> String {
    format!(
        "You are a Meta Ads strategist. Given a short business description, \
         output a concise JSON object with fields: campaignName, objective \
         (LEAD_GENERATION|ENGAGEMENT|LINK_CLICKS|AWARENESS), message, \
         websiteUrl, budgetDaily ({currency}), minAge, maxAge, countries \
         (ISO codes array), interests (array), genders (subset of \
         ['male','female']). Keep it realistic for {country} by default.",
        currency = defaults.currency,
        country = defaults.country,
    )
}

pub struct PlanGenerator {
    http: reqwest::Client,
    config: AzureOpenAiConfig,
    defaults: DefaultsConfig,
}

impl PlanGenerator {
    pub fn new(config: AzureOpenAiConfig, defaults: DefaultsConfig) -> LaunchResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            http,
            config,
            defaults,
        })
    }

    /// Generate a plan from a free-text business description.
    pub async fn generate(&self, prompt: &str) -> LaunchResult<AdPlan> {
        if prompt.trim().is_empty() {
            return Err(LaunchError::Validation("prompt must not be empty".into()));
        }

        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version,
        );
        let body = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_instruction(&self.defaults),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        debug!(deployment = %self.config.deployment, "Requesting ad plan");
        let response = self
            .http
            .post(&url)
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                LaunchError::PlanGeneration(format!("completion endpoint unreachable: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LaunchError::PlanGeneration(format!(
                "completion endpoint returned {}: {text}",
                status.as_u16()
            )));
        }

        let data: ChatResponse = response.json().await.map_err(|e| {
            LaunchError::PlanGeneration(format!("malformed completion response: {e}"))
        })?;
        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                LaunchError::PlanGeneration("completion response has no content".into())
            })?;

        plan_from_content(&content, &self.defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> DefaultsConfig {
        DefaultsConfig::default()
    }

    #[test]
    fn test_empty_countries_and_low_budget_are_defaulted() {
        let content = r#"{
            "campaignName": "Yoga Promo",
            "objective": "LEAD_GENERATION",
            "message": "Join now",
            "budgetDaily": 50,
            "minAge": 25,
            "maxAge": 45,
            "countries": []
        }"#;
        let plan = plan_from_content(content, &defaults()).unwrap();
        assert_eq!(plan.countries, vec!["IN".to_string()]);
        assert_eq!(plan.budget_daily, 500.0);
        // Ages were present, so they are not touched.
        assert_eq!(plan.min_age, 25);
        assert_eq!(plan.max_age, 45);
    }

    #[test]
    fn test_absent_ages_default_to_21_and_55() {
        let content = r#"{
            "campaignName": "Yoga Promo",
            "objective": "AWARENESS",
            "message": "Join now",
            "budgetDaily": 800,
            "countries": ["US"]
        }"#;
        let plan = plan_from_content(content, &defaults()).unwrap();
        assert_eq!(plan.min_age, 21);
        assert_eq!(plan.max_age, 55);
        assert_eq!(plan.budget_daily, 800.0);
        assert_eq!(plan.countries, vec!["US".to_string()]);
    }

    #[test]
    fn test_budget_at_minimum_is_kept() {
        let content = r#"{"budgetDaily": 100, "countries": ["IN"]}"#;
        let plan = plan_from_content(content, &defaults()).unwrap();
        assert_eq!(plan.budget_daily, 100.0);
    }

    #[test]
    fn test_structurally_sparse_json_passes_through_with_defaults() {
        let plan = plan_from_content("{}", &defaults()).unwrap();
        assert_eq!(plan.campaign_name, "");
        assert_eq!(plan.objective, "");
        assert_eq!(plan.budget_daily, 500.0);
        assert_eq!(plan.min_age, 21);
        assert_eq!(plan.max_age, 55);
        assert_eq!(plan.countries, vec!["IN".to_string()]);
    }

    #[test]
    fn test_invalid_json_is_a_plan_generation_error() {
        let err = plan_from_content("Sure! Here is your plan:", &defaults()).unwrap_err();
        assert!(matches!(err, LaunchError::PlanGeneration(_)));
    }

    #[test]
    fn test_system_instruction_localizes_defaults() {
        let mut d = defaults();
        d.country = "US".into();
        d.currency = "USD".into();
        let instruction = system_instruction(&d);
        assert!(instruction.contains("budgetDaily (USD)"));
        assert!(instruction.contains("realistic for US"));
    }
}
