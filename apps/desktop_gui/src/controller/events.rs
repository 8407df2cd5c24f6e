//! UI/backend events and error modeling for desktop GUI controller.

use std::path::PathBuf;

use client_core::{FailureKind, GenerationFailure, MutationState};

pub enum UiEvent {
    Info(String),
    GenerationSettled(MutationState),
    VideoSaved { path: PathBuf, bytes: u64 },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Server,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Generate,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    /// Classifies a settled generation failure from its kind and HTTP status.
    pub fn from_failure(context: UiErrorContext, failure: &GenerationFailure) -> Self {
        let category = match failure.kind() {
            FailureKind::Network => UiErrorCategory::Transport,
            FailureKind::Status(status) if (400..500).contains(&status) => {
                UiErrorCategory::Validation
            }
            FailureKind::Status(_) | FailureKind::Decode => UiErrorCategory::Server,
            FailureKind::Cancelled => UiErrorCategory::Unknown,
        };

        Self {
            category,
            context,
            message: failure.message().to_string(),
        }
    }

    /// Best-effort classification for errors that only exist as text, such as
    /// worker startup failures.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("failed to reach")
            || message_lower.contains("connection")
            || message_lower.contains("timed out")
            || message_lower.contains("network")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("must not be empty")
            || message_lower.contains("limit")
            || message_lower.contains("invalid")
            || message_lower.contains("missing")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("status 5")
            || message_lower.contains("internal")
            || message_lower.contains("server error")
        {
            UiErrorCategory::Server
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
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
