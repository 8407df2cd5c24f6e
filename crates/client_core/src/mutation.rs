//! Single-flight lifecycle around one generation call.

use std::{fmt, sync::Arc};

use shared::{domain::GenerationResult, protocol::GenerationRequest};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    store::ResultStore,
    transport::{GenerationTransport, TransportError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Status(u16),
    Decode,
    Cancelled,
}

/// Why a generation settled in error, with the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    kind: FailureKind,
    message: String,
}

impl GenerationFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "generation failed".to_string();
        }
        Self { kind, message }
    }

    pub fn cancelled() -> Self {
        Self::new(FailureKind::Cancelled, "generation cancelled")
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind {
            FailureKind::Status(status) => Some(status),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&TransportError> for GenerationFailure {
    fn from(err: &TransportError) -> Self {
        let kind = match err {
            TransportError::Network(_) => FailureKind::Network,
            TransportError::Status { status, .. } => FailureKind::Status(*status),
            TransportError::Decode(_) => FailureKind::Decode,
        };
        Self::new(kind, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationState {
    Idle,
    Pending,
    Success(Arc<GenerationResult>),
    Error(GenerationFailure),
}

impl MutationState {
    pub fn status(&self) -> MutationStatus {
        match self {
            Self::Idle => MutationStatus::Idle,
            Self::Pending => MutationStatus::Pending,
            Self::Success(_) => MutationStatus::Success,
            Self::Error(_) => MutationStatus::Error,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn result(&self) -> Option<&Arc<GenerationResult>> {
        match self {
            Self::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&GenerationFailure> {
        match self {
            Self::Error(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.failure().map(GenerationFailure::message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Pending,
    Success,
    Error,
}

impl MutationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("script text must not be empty")]
    EmptyText,
    #[error("a generation is already in progress")]
    AlreadyPending,
}

pub struct GenerationMutation {
    transport: Arc<dyn GenerationTransport>,
    store: Arc<ResultStore>,
    state: watch::Sender<MutationState>,
}

impl GenerationMutation {
    pub fn new(transport: Arc<dyn GenerationTransport>, store: Arc<ResultStore>) -> Self {
        let (state, _) = watch::channel(MutationState::Idle);
        Self {
            transport,
            store,
            state,
        }
    }

    pub fn state(&self) -> MutationState {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> MutationStatus {
        self.state.borrow().status()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.state.subscribe()
    }

    pub fn store(&self) -> &Arc<ResultStore> {
        &self.store
    }

    /// Runs one generation for `text`.
    ///
    /// Rejected without touching the transport when the text is blank or a
    /// call is already in flight. On success the result lands both in the
    /// returned state and in the shared store.
    pub async fn trigger(&self, text: &str) -> Result<MutationState, MutationError> {
        let (request, pending) = self.begin(text)?;
        info!(text_len = request.text.len(), "generation started");

        let settled = match self.transport.generate(&request).await {
            Ok(result) => {
                let result = Arc::new(result);
                self.store.set_shared(Arc::clone(&result));
                info!(
                    video = %result.result.video.url,
                    keywords = result.keywords.len(),
                    "generation succeeded"
                );
                MutationState::Success(result)
            }
            Err(err) => {
                let failure = GenerationFailure::from(&err);
                warn!(error = %failure, status = ?failure.status(), "generation failed");
                MutationState::Error(failure)
            }
        };

        pending.settle(settled.clone());
        Ok(settled)
    }

    /// Returns a settled controller to `Idle`. The shared store is untouched.
    pub fn reset(&self) -> Result<(), MutationError> {
        let mut blocked = false;
        self.state.send_if_modified(|state| match state {
            MutationState::Pending => {
                blocked = true;
                false
            }
            MutationState::Idle => false,
            _ => {
                *state = MutationState::Idle;
                true
            }
        });

        if blocked {
            Err(MutationError::AlreadyPending)
        } else {
            Ok(())
        }
    }

    fn begin(&self, text: &str) -> Result<(GenerationRequest, PendingGuard<'_>), MutationError> {
        let request = GenerationRequest::new(text);
        if request.is_blank() {
            return Err(MutationError::EmptyText);
        }

        // Check-and-set happens under the channel's lock, so two racing
        // triggers cannot both observe a non-pending state.
        let mut started = false;
        self.state.send_if_modified(|state| {
            if state.is_pending() {
                return false;
            }
            *state = MutationState::Pending;
            started = true;
            true
        });

        if started {
            Ok((
                request,
                PendingGuard {
                    state: &self.state,
                    armed: true,
                },
            ))
        } else {
            Err(MutationError::AlreadyPending)
        }
    }
}

/// Owns the `Pending` state of one trigger. Dropping it before
/// [`PendingGuard::settle`] means the caller abandoned the call, and the
/// controller settles as cancelled so it can be triggered again.
struct PendingGuard<'a> {
    state: &'a watch::Sender<MutationState>,
    armed: bool,
}

impl PendingGuard<'_> {
    fn settle(mut self, settled: MutationState) {
        self.armed = false;
        self.state.send_replace(settled);
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("generation dropped before it settled");
            self.state
                .send_replace(MutationState::Error(GenerationFailure::cancelled()));
        }
    }
}

#[cfg(test)]
#[path = "tests/mutation_tests.rs"]
mod tests;
