use thiserror::Error;

pub type LaunchResult<T> = Result<T, LaunchError>;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Missing required settings: {}", missing.join(", "))]
    Config { missing: Vec<String> },

    #[error("Meta API {status}: {body}")]
    RemoteApi { status: u16, body: String },

    #[error("Plan generation error: {0}")]
    PlanGeneration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LaunchError {
    /// Non-2xx response from the ads platform, carrying the raw body text.
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::RemoteApi {
            status,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_carries_status_and_body() {
        let err = LaunchError::remote(400, "(#100) Invalid parameter");
        assert_eq!(
            err.to_string(),
            "Meta API 400: (#100) Invalid parameter"
        );
    }

    #[test]
    fn test_config_error_lists_missing_settings() {
        let err = LaunchError::Config {
            missing: vec!["META_ACCESS_TOKEN".into(), "META_PAGE_ID".into()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required settings: META_ACCESS_TOKEN, META_PAGE_ID"
        );
    }
}
