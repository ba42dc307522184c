// Response delivery
//
// ResponseEmitter is the transport seam (HTTP PUT on Lambda, recorders in
// tests). OnceEmitter guards a single invocation so that CloudFormation never
// receives two signals for the same request.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::EmitError;
use crate::response::ResponseDocument;

/// Delivers a response document to the event's callback destination
#[async_trait]
pub trait ResponseEmitter: Send + Sync {
    async fn emit(&self, destination: &str, document: &ResponseDocument) -> Result<(), EmitError>;
}

/// At-most-once wrapper around an emitter, scoped to one invocation.
///
/// Only the first `emit` reaches the inner emitter. Every later call fails
/// with [`EmitError::AlreadySent`], whether or not the first one succeeded.
pub struct OnceEmitter<'a> {
    inner: &'a dyn ResponseEmitter,
    sent: AtomicBool,
}

impl<'a> OnceEmitter<'a> {
    pub fn new(inner: &'a dyn ResponseEmitter) -> Self {
        Self {
            inner,
            sent: AtomicBool::new(false),
        }
    }

    pub fn is_sent(&self) -> bool {
        self.sent.load(Ordering::Acquire)
    }

    pub async fn emit(
        &self,
        destination: &str,
        document: &ResponseDocument,
    ) -> Result<(), EmitError> {
        if self.sent.swap(true, Ordering::AcqRel) {
            return Err(EmitError::AlreadySent);
        }
        self.inner.emit(destination, document).await
    }
}
