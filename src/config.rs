use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::validation::VerdictMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub llm: LlmConfig,
    pub rate_limit: RateLimitSettings,
    pub generation: GenerationConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Any OpenAI-compatible `/chat/completions` endpoint
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => crate::llm::openai::DEFAULT_MODEL,
            Provider::Anthropic => crate::llm::anthropic::DEFAULT_MODEL,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => crate::llm::openai::DEFAULT_BASE_URL,
            Provider::Anthropic => crate::llm::anthropic::DEFAULT_BASE_URL,
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenAi => "NVIDIA_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Highest sampling temperature the provider accepts
    fn max_temperature(&self) -> f32 {
        match self {
            Provider::OpenAi => 2.0,
            Provider::Anthropic => 1.0,
        }
    }
}

/// LLM connection settings. Unset `base_url`, `model` and `api_key_env`
/// fall back to the selected provider's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: Provider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Name of the environment variable holding the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            base_url: None,
            model: None,
            api_key_env: None,
            temperature: crate::llm::openai::DEFAULT_TEMPERATURE,
            max_tokens: 4096,
            timeout_ms: 120000,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(self.provider.default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(self.provider.default_base_url())
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or(self.provider.default_api_key_env())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub requests_per_second: f64,
    pub max_bucket_size: f64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            requests_per_second: 0.5,
            max_bucket_size: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_refinements: u32,
    pub output_path: PathBuf,
    pub verdict_mode: VerdictMode,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_refinements: 5,
            output_path: PathBuf::from("resume.html"),
            verdict_mode: VerdictMode::Strict,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub save_prompts: bool,
    pub save_responses: bool,
    pub transcript_dir: PathBuf,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            save_prompts: false,
            save_responses: false,
            transcript_dir: PathBuf::from(".resumegen"),
        }
    }
}

impl DebugConfig {
    pub fn transcript_enabled(&self) -> bool {
        self.save_prompts || self.save_responses
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            llm: LlmConfig::default(),
            rate_limit: RateLimitSettings::default(),
            generation: GenerationConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

/// Result of walking the config fallback chain
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config came from; `None` means built-in defaults
    pub source: Option<PathBuf>,
    /// Candidate files that exist but could not be used, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            let config =
                Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()))?;
            return Ok(LoadedConfig {
                config,
                source: Some(path.clone()),
                skipped: Vec::new(),
            });
        }

        let project_name = env!("CARGO_PKG_NAME");
        let mut candidates = Vec::new();

        // Primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(project_name).join(format!("{}.yml", project_name)));
        }

        // Fallback location: ./<project>.yml
        candidates.push(PathBuf::from(format!("{}.yml", project_name)));

        Ok(Self::load_first(&candidates))
    }

    /// The first candidate that exists and loads wins; broken ones are skipped
    fn load_first(candidates: &[PathBuf]) -> LoadedConfig {
        let mut skipped = Vec::new();

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(config) => {
                    return LoadedConfig {
                        config,
                        source: Some(path.clone()),
                        skipped,
                    };
                }
                Err(e) => {
                    log::warn!("Failed to load config from {}: {:#}", path.display(), e);
                    skipped.push((path.clone(), format!("{:#}", e)));
                }
            }
        }

        log::info!("No usable config file found, using defaults");
        LoadedConfig {
            config: Self::default(),
            source: None,
            skipped,
        }
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config = Self::from_yaml(&content)?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the run could never succeed with
    pub fn validate(&self) -> Result<()> {
        let max_temperature = self.llm.provider.max_temperature();
        if !(0.0..=max_temperature).contains(&self.llm.temperature) {
            eyre::bail!(
                "llm.temperature must be within 0.0..={} for {:?}, got {}",
                max_temperature,
                self.llm.provider,
                self.llm.temperature
            );
        }
        if self.llm.model().trim().is_empty() {
            eyre::bail!("llm.model must not be empty");
        }
        if self.llm.base_url().trim().is_empty() {
            eyre::bail!("llm.base_url must not be empty");
        }
        if self.llm.api_key_env().trim().is_empty() {
            eyre::bail!("llm.api_key_env must not be empty");
        }
        if self.generation.output_path.as_os_str().is_empty() {
            eyre::bail!("generation.output_path must not be empty");
        }
        if self.rate_limit.enabled {
            self.rate_limit_config()
                .validate()
                .map_err(|e| eyre::eyre!("rate_limit: {}", e))?;
        }
        Ok(())
    }

    pub fn rate_limit_config(&self) -> crate::llm::RateLimitConfig {
        crate::llm::RateLimitConfig {
            requests_per_second: self.rate_limit.requests_per_second,
            max_bucket_size: self.rate_limit.max_bucket_size,
        }
    }
}
