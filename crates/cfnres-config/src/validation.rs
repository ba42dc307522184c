// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;

/// CloudFormation rejects response documents above 4 KiB. The remaining
/// kilobyte is left for the ids and status that travel with the reason.
const MAX_REASON_BYTES_LIMIT: usize = 3072;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    if let Some(ref log) = config.log {
        validate_log_config(log)?;
    }

    validate_response_config(&config.response)?;

    Ok(())
}

fn validate_log_config(config: &LogConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        bail!("log.level must not be empty");
    }

    Ok(())
}

fn validate_response_config(config: &ResponseConfig) -> Result<()> {
    if config.timeout_secs == 0 {
        bail!("response.timeout_secs must be greater than 0");
    }

    if config.max_reason_bytes == 0 {
        bail!("response.max_reason_bytes must be greater than 0");
    }

    if config.max_reason_bytes > MAX_REASON_BYTES_LIMIT {
        bail!(
            "response.max_reason_bytes must not exceed {} (CloudFormation response limit)",
            MAX_REASON_BYTES_LIMIT
        );
    }

    if config.timeout_secs > 60 {
        warn!(
            timeout_secs = config.timeout_secs,
            "response.timeout_secs is very large; the function may time out before reporting"
        );
    }

    Ok(())
}
