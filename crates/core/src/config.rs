use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `ADLAUNCH__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub azure: AzureOpenAiConfig,
    #[serde(default)]
    pub meta: MetaConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Azure OpenAI chat-completions deployment used for plan generation.
#[derive(Debug, Clone, Deserialize)]
pub struct AzureOpenAiConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_deployment")]
    pub deployment: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

/// Meta Marketing (Graph) API credentials and scoping ids.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaConfig {
    #[serde(default = "default_graph_version")]
    pub graph_version: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub ad_account_id: String,
    #[serde(default)]
    pub page_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

// Default functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_deployment() -> String {
    "gpt-4o".to_string()
}
fn default_api_version() -> String {
    "2025-01-01-preview".to_string()
}
fn default_graph_version() -> String {
    "v18.0".to_string()
}
fn default_country() -> String {
    "IN".to_string()
}
fn default_currency() -> String {
    "INR".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for AzureOpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: default_deployment(),
            api_version: default_api_version(),
        }
    }
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            graph_version: default_graph_version(),
            access_token: String::new(),
            ad_account_id: String::new(),
            page_id: String::new(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            currency: default_currency(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            azure: AzureOpenAiConfig::default(),
            meta: MetaConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("ADLAUNCH")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Names of required settings that are absent. Checked once at startup
    /// and again before any operation that would need them, so a
    /// misconfigured deployment fails before the first network call.
    pub fn missing_settings(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.azure.endpoint.is_empty() {
            missing.push("ADLAUNCH__AZURE__ENDPOINT".to_string());
        }
        if self.azure.api_key.is_empty() {
            missing.push("ADLAUNCH__AZURE__API_KEY".to_string());
        }
        if self.meta.access_token.is_empty() {
            missing.push("ADLAUNCH__META__ACCESS_TOKEN".to_string());
        }
        if self.meta.ad_account_id.is_empty() {
            missing.push("ADLAUNCH__META__AD_ACCOUNT_ID".to_string());
        }
        if self.meta.page_id.is_empty() {
            missing.push("ADLAUNCH__META__PAGE_ID".to_string());
        }
        missing
    }
}
