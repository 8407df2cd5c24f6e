//! Holder of the last successful generation result.

use std::sync::Arc;

use shared::domain::GenerationResult;
use tokio::sync::watch;

/// Last-write-wins slot for the current [`GenerationResult`].
///
/// `None` means no generation has completed yet; whether one is in flight is
/// tracked by the mutation controller, not here.
#[derive(Debug)]
pub struct ResultStore {
    slot: watch::Sender<Option<Arc<GenerationResult>>>,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot }
    }

    pub fn get(&self) -> Option<Arc<GenerationResult>> {
        self.slot.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.borrow().is_none()
    }

    pub fn set(&self, result: GenerationResult) {
        self.set_shared(Arc::new(result));
    }

    pub fn set_shared(&self, result: Arc<GenerationResult>) {
        self.slot.send_replace(Some(result));
    }

    pub fn clear(&self) {
        self.slot.send_replace(None);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<GenerationResult>>> {
        self.slot.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
