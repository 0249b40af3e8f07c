use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {category} value: {value:?}")]
pub struct UnknownStateError {
    pub category: &'static str,
    pub value: String,
}

impl UnknownStateError {
    pub fn new(category: &'static str, value: impl Into<String>) -> Self {
        Self {
            category,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("host bridge is not attached")]
    Unavailable,
    #[error("host command queue is full")]
    QueueFull,
    #[error("host command processor disconnected")]
    Disconnected,
    #[error("host dropped the call without replying")]
    Dropped,
    #[error("host rejected {method}: {message}")]
    Rejected { method: String, message: String },
}
