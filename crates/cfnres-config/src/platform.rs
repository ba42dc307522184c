// Platform detection based on environment variables
//
// Auto-detects runtime environment:
// - AWS Lambda: AWS_LAMBDA_FUNCTION_NAME env var present
// - Local: anything else (tests, local invocation)

use std::env;

use crate::LogFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Lambda,
    Local,
}

impl Platform {
    /// Auto-detect the current platform based on environment variables
    pub fn detect() -> Self {
        if env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
            Platform::Lambda
        } else {
            Platform::Local
        }
    }

    /// Get platform-specific defaults
    pub fn defaults(&self) -> PlatformDefaults {
        match self {
            // CloudWatch Logs ingests JSON lines without ANSI colouring
            Platform::Lambda => PlatformDefaults {
                log_format: LogFormat::Json,
                response_timeout_secs: 10,
            },
            Platform::Local => PlatformDefaults {
                log_format: LogFormat::Text,
                response_timeout_secs: 30,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlatformDefaults {
    pub log_format: LogFormat,
    pub response_timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_defaults() {
        let lambda = Platform::Lambda.defaults();
        assert_eq!(lambda.log_format, LogFormat::Json);
        assert_eq!(lambda.response_timeout_secs, 10);

        let local = Platform::Local.defaults();
        assert_eq!(local.log_format, LogFormat::Text);
        assert_eq!(local.response_timeout_secs, 30);
    }
}
