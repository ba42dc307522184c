// HTTP response emitter
//
// CloudFormation hands every request a pre-signed S3 URL. The response
// document is PUT there with an empty Content-Type, which the signature
// expects.

use anyhow::{Context, Result};
use async_trait::async_trait;
use cfnres_config::ResponseConfig;
use cfnres_core::{EmitError, ResponseDocument, ResponseEmitter};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

/// Longest slice of an error body kept in `EmitError::Rejected`
const MAX_ERROR_BODY_BYTES: usize = 512;

pub struct HttpEmitter {
    client: reqwest::Client,
}

impl HttpEmitter {
    pub fn new(config: &ResponseConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create reqwest client")?;

        Ok(Self::with_client(client))
    }

    /// Create an emitter around a preconfigured client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResponseEmitter for HttpEmitter {
    async fn emit(
        &self,
        destination: &str,
        document: &ResponseDocument,
    ) -> Result<(), EmitError> {
        let body = serde_json::to_vec(document)?;
        debug!(bytes = body.len(), "Sending response document");

        let response = self
            .client
            .put(destination)
            .header(CONTENT_TYPE, "")
            .body(body)
            .send()
            .await
            .map_err(|e| EmitError::Transport {
                destination: redact_query(destination),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY_BYTES {
            body = cfnres_core::response::truncate_reason(&body, MAX_ERROR_BODY_BYTES);
        }
        Err(EmitError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Pre-signed URLs carry credentials in the query string; keep them out of logs
fn redact_query(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{}?<redacted>", base),
        None => url.to_string(),
    }
}
