use crate::{LambdaConfig, LogConfig, LogFormat, RuntimeConfig};
use anyhow::{anyhow, Context, Result};

pub const ENV_PREFIX: &str = "CFNRES_";

/// Abstraction over environment-variable lookups so tests can supply their
/// own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the CFNRES_ prefix.
    /// Used for variables set by the Lambda service (AWS_LAMBDA_*).
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL")? {
        ensure_log(config).level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT")? {
        ensure_log(config).format = format
            .parse::<LogFormat>()
            .context("Invalid CFNRES_LOG_FORMAT value")?;
    }

    // Response delivery
    if let Some(val) = get_env_u64(env, "RESPONSE_TIMEOUT_SECS")? {
        config.response.timeout_secs = val;
    }
    if let Some(val) = get_env_usize(env, "MAX_REASON_BYTES")? {
        config.response.max_reason_bytes = val;
    }
    if let Some(agent) = get_env_string(env, "USER_AGENT")? {
        config.response.user_agent = agent;
    }

    // Values the Lambda service sets for every function
    if let Some(name) = get_raw_env_string(env, "AWS_LAMBDA_FUNCTION_NAME")? {
        ensure_lambda(config).function_name = Some(name);
    }
    if let Some(stream) = get_raw_env_string(env, "AWS_LAMBDA_LOG_STREAM_NAME")? {
        ensure_lambda(config).log_stream_name = Some(stream);
    }

    Ok(())
}

fn ensure_log(config: &mut RuntimeConfig) -> &mut LogConfig {
    config.log.get_or_insert_with(LogConfig::default)
}

fn ensure_lambda(config: &mut RuntimeConfig) -> &mut LambdaConfig {
    config.lambda.get_or_insert_with(LambdaConfig::default)
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Result<Option<String>> {
    Ok(env.get(key).filter(|v| !v.trim().is_empty()))
}

fn get_raw_env_string<E: EnvSource>(env: &E, key: &str) -> Result<Option<String>> {
    Ok(env.get_raw(key).filter(|v| !v.trim().is_empty()))
}

fn get_env_usize<E: EnvSource>(env: &E, key: &str) -> Result<Option<usize>> {
    match get_env_string(env, key)? {
        Some(val) => {
            let parsed = val
                .trim()
                .parse::<usize>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_u64<E: EnvSource>(env: &E, key: &str) -> Result<Option<u64>> {
    match get_env_string(env, key)? {
        Some(val) => {
            let parsed = val
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}
