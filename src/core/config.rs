use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::error::ConfigError;

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Wire format of the upstream API. Decides how a request body is
/// translated and how the API key is sent; responses are normalized the
/// same way for all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI chat completions and compatible relays (Azure, OpenRouter, Groq)
    #[default]
    #[serde(rename = "openai")]
    #[value(name = "openai")]
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => OPENAI_BASE_URL,
            Self::Anthropic => ANTHROPIC_BASE_URL,
            Self::Gemini => GEMINI_BASE_URL,
        }
    }

    /// Full streaming endpoint for `model` under `base_url`.
    pub fn endpoint(&self, base_url: &str, model: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self {
            Self::OpenAi => format!("{base}/v1/chat/completions"),
            Self::Anthropic => format!("{base}/v1/messages"),
            Self::Gemini => {
                format!("{base}/v1beta/models/{model}:streamGenerateContent?alt=sse")
            }
        }
    }

    pub fn auth_headers(&self, api_key: &str) -> Vec<(String, String)> {
        match self {
            Self::OpenAi => vec![("Authorization".into(), format!("Bearer {api_key}"))],
            Self::Anthropic => vec![
                ("x-api-key".into(), api_key.to_string()),
                ("anthropic-version".into(), ANTHROPIC_VERSION.into()),
            ],
            Self::Gemini => vec![("x-goog-api-key".into(), api_key.to_string())],
        }
    }

    fn api_key_env(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    /// Overrides the provider's default base URL
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Whole-request timeout applied by the HTTP transport
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub debug: bool,
}

/// One config file as written on disk. Only the keys present override
/// what earlier layers set.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub provider: Option<ProviderKind>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub timeout_secs: Option<u64>,
    pub debug: Option<bool>,
}

fn default_model() -> String {
    "gpt-4.1-nano".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: None,
            api_key: None,
            model: default_model(),
            headers: BTreeMap::new(),
            timeout_secs: None,
            debug: false,
        }
    }
}

impl AppConfig {
    pub fn get_api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    pub fn endpoint(&self) -> String {
        self.provider.endpoint(self.base_url(), &self.model)
    }

    /// Configured headers followed by the provider's auth headers.
    pub fn request_headers(&self) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(key) = self.get_api_key() {
            headers.extend(self.provider.auth_headers(key));
        }
        headers
    }
}

pub fn load_config(working_dir: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    let wd = working_dir.unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let mut config = AppConfig::default();

    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("asyncllm").join("config.json");
        if let Some(file_config) = read_config_file(&global_path)? {
            merge_config(&mut config, file_config);
        }
    }

    if let Some(file_config) = read_config_file(&wd.join("asyncllm.json"))? {
        merge_config(&mut config, file_config);
    }

    detect_env(&mut config);

    Ok(config)
}

pub fn read_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::File(format!("{}: {e}", path.display())))?;
    let config = serde_json::from_str(&content)
        .map_err(|e| ConfigError::Invalid(format!("{}: {e}", path.display())))?;
    Ok(Some(config))
}

pub fn merge_config(base: &mut AppConfig, overlay: ConfigFile) {
    if let Some(provider) = overlay.provider {
        base.provider = provider;
    }
    if overlay.base_url.is_some() {
        base.base_url = overlay.base_url;
    }
    if overlay.api_key.is_some() {
        base.api_key = overlay.api_key;
    }
    if let Some(model) = overlay.model {
        base.model = model;
    }
    base.headers.extend(overlay.headers);
    if overlay.timeout_secs.is_some() {
        base.timeout_secs = overlay.timeout_secs;
    }
    if let Some(debug) = overlay.debug {
        base.debug = debug;
    }
}

fn detect_env(config: &mut AppConfig) {
    if let Some(url) = non_empty_env("ASYNCLLM_BASE_URL") {
        config.base_url = Some(url);
    }

    if config.get_api_key().is_some() {
        return;
    }

    for env_var in ["ASYNCLLM_API_KEY", config.provider.api_key_env()] {
        if let Some(key) = non_empty_env(env_var) {
            config.api_key = Some(key);
            return;
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
