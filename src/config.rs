use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::llm::LLMFactory;

/// Process-wide configuration, built once at startup and shared read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Origins allowed to call the endpoints. Empty means any origin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// How the completion request asks for JSON output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// `response_format: json_schema` with a strict schema
    #[default]
    JsonSchema,
    /// `response_format: json_object`, for providers without schema support
    JsonObject,
}

/// Configuration for the upstream chat-completion provider
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub temperature: f64,

    #[serde(default)]
    pub store: bool,

    #[serde(default)]
    pub output_mode: OutputMode,

    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_provider() -> String {
    "openai_llm".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: None,
            api_key: None,
            model: default_model(),
            temperature: 0.0,
            store: false,
            output_mode: OutputMode::default(),
            request_timeout_secs: None,
        }
    }
}

// The API key must never reach a log line.
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("store", &self.store)
            .field("output_mode", &self.output_mode)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Spreadsheet form script that receives contact submissions
    #[serde(default)]
    pub script_url: Option<String>,
}

impl Config {
    /// Load configuration from a YAML or JSON file, substituting `${VAR}` references.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }
        let content = fs::read_to_string(path)?;
        let path_lower = path.to_lowercase();
        Self::parse(&content, path_lower.ends_with(".json"), |name| std::env::var(name).ok())
    }

    /// Parse configuration text. `lookup` resolves `${VAR}` references.
    pub fn parse(
        content: &str,
        is_json: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let content = substitute_env(content, lookup)?;
        let config = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }

    /// Try the candidate files in order, falling back to defaults when none exists.
    /// Returns the path that was loaded, if any.
    pub fn discover() -> Result<(Self, Option<String>)> {
        let candidates: Vec<String> = vec![
            std::env::var("CONFIG_PATH").ok(),
            Some("conf.yaml".to_string()),
            Some("conf.json".to_string()),
        ]
        .into_iter()
        .flatten()
        .collect();

        for path in candidates {
            if !Path::new(&path).exists() {
                debug!("No config file at {}", path);
                continue;
            }
            let config = Self::load(&path)?;
            return Ok((config, Some(path)));
        }

        Ok((Self::default(), None))
    }

    /// Apply environment overrides on top of file values.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT {:?}: {}", port, e))?;
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = Some(base_url);
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.llm.model = model;
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.cors.allowed_origins = parse_origin_list(&origins);
        }
        if let Some(url) = lookup("GOOGLE_SCRIPT_URL") {
            self.contact.script_url = Some(url);
        }
        self.normalize();
        Ok(())
    }

    /// Blank values and unresolved `${VAR}` placeholders count as unset.
    fn normalize(&mut self) {
        self.llm.api_key = self.llm.api_key.take().filter(|v| is_set(v));
        self.llm.base_url = self.llm.base_url.take().filter(|v| is_set(v));
        self.contact.script_url = self.contact.script_url.take().filter(|v| is_set(v));
        self.cors.allowed_origins.retain(|v| is_set(v));
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port must be non-zero");
        }
        if self.llm.api_key.is_none() && LLMFactory::requires_key(&self.llm.provider) {
            warn!("No LLM API key configured; /api/translate will fail upstream");
        }
        if self.contact.script_url.is_none() {
            warn!("No contact script URL configured; /api/contact will fail");
        }
        Ok(())
    }
}

fn is_set(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !value.starts_with("${")
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// Replace `${VAR_NAME}` with the looked-up value; unknown variables are left as-is.
fn substitute_env(content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        match lookup(var_name) {
            Some(value) => value,
            None => {
                warn!("Environment variable {} is not set", var_name);
                caps[0].to_string()
            }
        }
    });
    Ok(replaced.into_owned())
}
