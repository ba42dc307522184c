// cfnres-config - Configuration for the custom-resource runtime
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from CFNRES_CONFIG env var
// 3. Config file contents from CFNRES_CONFIG_CONTENT env var
// 4. Default config file locations (./cfnres.toml, ./.cfnres.toml)
// 5. Platform-specific defaults (lowest priority)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod env_overrides;
mod platform;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, ENV_PREFIX};
pub use platform::Platform;

/// Main runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,

    #[serde(default)]
    pub response: ResponseConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda: Option<LambdaConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

/// Response delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseConfig {
    /// Timeout for the PUT to the pre-signed ResponseURL
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Failure reasons longer than this are truncated
    #[serde(default = "default_max_reason_bytes")]
    pub max_reason_bytes: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_reason_bytes() -> usize {
    2048
}

fn default_user_agent() -> String {
    format!("cfnres/{}", env!("CARGO_PKG_VERSION"))
}

impl ResponseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_reason_bytes: default_max_reason_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

/// Lambda-specific configuration, filled from the Lambda environment
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LambdaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,

    /// Fallback PhysicalResourceId for resources that never got one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_stream_name: Option<String>,
}

/// Contents of a config file or of `CFNRES_CONFIG_CONTENT`.
///
/// Every key is optional; keys left out keep the value from the layer below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub log: Option<LogFile>,

    #[serde(default)]
    pub response: Option<ResponseFile>,

    #[serde(default)]
    pub lambda: Option<LambdaConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogFile {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseFile {
    pub timeout_secs: Option<u64>,
    pub max_reason_bytes: Option<usize>,
    pub user_agent: Option<String>,
}

impl ConfigFile {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl RuntimeConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        let platform = Platform::detect();
        sources::load_config(platform)
    }

    /// Load configuration for a specific platform (useful for testing)
    pub fn load_for_platform(platform: Platform) -> Result<Self> {
        sources::load_config(platform)
    }

    /// Build a configuration from inline TOML plus overrides from `env`
    pub fn load_for_platform_with_env<E: EnvSource>(
        platform: Platform,
        inline_config: Option<&str>,
        env: &E,
    ) -> Result<Self> {
        let mut config = RuntimeConfig::from_platform_defaults(platform);

        if let Some(inline) = inline_config {
            let file_config = ConfigFile::parse(inline)
                .context("Failed to parse inline config content")?;
            config.merge(file_config);
        }

        env_overrides::apply_env_overrides(&mut config, env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_platform_defaults(platform: Platform) -> Self {
        let defaults = platform.defaults();
        RuntimeConfig {
            log: Some(LogConfig {
                level: "info".to_string(),
                format: defaults.log_format,
            }),
            response: ResponseConfig {
                timeout_secs: defaults.response_timeout_secs,
                ..ResponseConfig::default()
            },
            lambda: match platform {
                Platform::Lambda => Some(LambdaConfig::default()),
                Platform::Local => None,
            },
        }
    }

    /// Keys present in `file` replace ours
    pub fn merge(&mut self, file: ConfigFile) {
        if let Some(log) = file.log {
            let target = self.log.get_or_insert_with(LogConfig::default);
            if let Some(level) = log.level {
                target.level = level;
            }
            if let Some(format) = log.format {
                target.format = format;
            }
        }

        if let Some(response) = file.response {
            if let Some(timeout_secs) = response.timeout_secs {
                self.response.timeout_secs = timeout_secs;
            }
            if let Some(max_reason_bytes) = response.max_reason_bytes {
                self.response.max_reason_bytes = max_reason_bytes;
            }
            if let Some(user_agent) = response.user_agent {
                self.response.user_agent = user_agent;
            }
        }

        if let Some(lambda) = file.lambda {
            let target = self.lambda.get_or_insert_with(LambdaConfig::default);
            if lambda.function_name.is_some() {
                target.function_name = lambda.function_name;
            }
            if lambda.log_stream_name.is_some() {
                target.log_stream_name = lambda.log_stream_name;
            }
        }
    }

    /// Effective logging settings
    pub fn log(&self) -> LogConfig {
        self.log.clone().unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}
