//! Bookkeeping for host calls the UI chose to watch.

use client_core::HostCall;

use crate::controller::events::{UiError, UiErrorContext};

/// Calls whose acknowledgement the UI polls each frame. Rejections become
/// banner errors; successful acknowledgements are dropped silently.
#[derive(Default)]
pub struct PendingCalls {
    calls: Vec<HostCall>,
}

impl PendingCalls {
    pub fn track(&mut self, call: Option<HostCall>) {
        if let Some(call) = call {
            self.calls.push(call);
        }
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn poll(&mut self) -> Vec<UiError> {
        let mut errors = Vec::new();
        self.calls.retain_mut(|call| match call.try_acknowledged() {
            None => true,
            Some(Ok(())) => {
                tracing::debug!(method = call.method(), "host acknowledged call");
                false
            }
            Some(Err(err)) => {
                tracing::warn!(method = call.method(), "host call failed: {err}");
                errors.push(UiError::from_message(UiErrorContext::HostCall, err.to_string()));
                false
            }
        });
        errors
    }
}
