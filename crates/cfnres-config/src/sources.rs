// Configuration source loading from the process environment and files.
//
// Priority order:
// 1. Environment variables (CFNRES_* prefix)
// 2. Config file path from CFNRES_CONFIG
// 3. Inline config content from CFNRES_CONFIG_CONTENT
// 4. Default config files (./cfnres.toml, ./.cfnres.toml)
// 5. Platform defaults (based on auto-detected Platform)

use crate::env_overrides::{self, EnvSource, ENV_PREFIX};
use crate::platform::Platform;
use crate::{ConfigFile, RuntimeConfig};
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

/// Load configuration for `platform` using the process environment and files.
pub fn load_config(platform: Platform) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::from_platform_defaults(platform);

    if let Some(file_config) = load_from_file()? {
        config.merge(file_config);
    }

    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file() -> Result<Option<ConfigFile>> {
    if let Ok(path) = env::var("CFNRES_CONFIG") {
        return read_config_file(Path::new(&path)).map(Some);
    }

    if let Ok(content) = env::var("CFNRES_CONFIG_CONTENT") {
        let config = ConfigFile::parse(&content)
            .context("Failed to parse inline config from CFNRES_CONFIG_CONTENT")?;
        return Ok(Some(config));
    }

    for path in &["./cfnres.toml", "./.cfnres.toml"] {
        let path = Path::new(path);
        if path.exists() {
            return read_config_file(path).map(Some);
        }
    }

    Ok(None)
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    ConfigFile::parse(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogFormat;

    #[test]
    fn platform_defaults_match_expectations() {
        let lambda = RuntimeConfig::from_platform_defaults(Platform::Lambda);
        assert_eq!(lambda.log().format, LogFormat::Json);
        assert!(lambda.lambda.is_some());

        let local = RuntimeConfig::from_platform_defaults(Platform::Local);
        assert_eq!(local.log().format, LogFormat::Text);
        assert!(local.lambda.is_none());
    }

    #[test]
    fn read_config_file_reports_path() {
        let err = read_config_file(Path::new("/nonexistent/cfnres.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cfnres.toml"));
    }
}
