//! Host-to-UI events and error modeling for the desktop shell.

use shared::{domain::PathKind, protocol::HostNotification};

#[derive(Debug)]
pub enum UiEvent {
    Notification(HostNotification),
    Info(String),
    Error(UiError),
    PathPicked { kind: PathKind, path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    HostStartup,
    HostCall,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("missing")
            || message_lower.contains("invalid")
            || message_lower.contains("expected folder")
            || message_lower.contains("not a directory")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("queue")
            || message_lower.contains("disconnected")
            || message_lower.contains("dropped")
            || message_lower.contains("runtime")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Short line for the status banner.
    pub fn banner_text(&self) -> String {
        match self.category {
            UiErrorCategory::Validation => format!("Check your input: {}", self.message),
            UiErrorCategory::Transport => {
                format!("Host unavailable; restart the app if this persists ({})", self.message)
            }
            UiErrorCategory::Unknown => self.message.clone(),
        }
    }
}
