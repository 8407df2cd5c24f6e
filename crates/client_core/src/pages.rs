//! Headless page models for the two client routes.
//!
//! The shared [`ResultStore`] is what pages render from; the mutation is only
//! consulted for pending/error status.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use shared::domain::GenerationResult;

use crate::{
    download::{DownloadError, VideoDownloader},
    mutation::{GenerationMutation, MutationError, MutationState},
    store::ResultStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Generate,
    Edit,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Generate, Route::Edit];

    pub fn path(self) -> &'static str {
        match self {
            Self::Generate => "/generate",
            Self::Edit => "/edit",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.path() == path)
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    current: Route,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            current: Route::Generate,
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn navigate(&mut self, route: Route) {
        if self.current != route {
            tracing::debug!(from = self.current.path(), to = route.path(), "navigate");
        }
        self.current = route;
    }

    pub fn navigate_path(&mut self, path: &str) -> Option<Route> {
        let route = Route::from_path(path)?;
        self.navigate(route);
        Some(route)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateView {
    Editor {
        text: String,
        can_generate: bool,
        pending: bool,
        error: Option<String>,
    },
    Video {
        url: String,
        name: String,
    },
}

pub struct GeneratePage {
    text: String,
    mutation: Arc<GenerationMutation>,
    store: Arc<ResultStore>,
}

impl GeneratePage {
    pub fn new(mutation: Arc<GenerationMutation>) -> Self {
        let store = Arc::clone(mutation.store());
        Self {
            text: String::new(),
            mutation,
            store,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn can_generate(&self) -> bool {
        !self.text.trim().is_empty() && !self.mutation.is_pending()
    }

    pub fn view(&self) -> GenerateView {
        let state = self.mutation.state();
        if !state.is_pending() {
            if let Some(result) = self.store.get() {
                let video = result.video();
                return GenerateView::Video {
                    url: video.url.clone(),
                    name: video.file_name().to_string(),
                };
            }
        }

        GenerateView::Editor {
            text: self.text.clone(),
            can_generate: self.can_generate(),
            pending: state.is_pending(),
            error: state.error().map(str::to_string),
        }
    }

    pub async fn generate(&self) -> Result<MutationState, MutationError> {
        self.mutation.trigger(&self.text).await
    }

    /// Moves to the edit route once a result is available.
    pub fn edit(&self, navigator: &mut Navigator) -> bool {
        if self.store.is_empty() || self.mutation.is_pending() {
            return false;
        }
        navigator.navigate(Route::Edit);
        true
    }

    /// Downloads the current video into `dir`; `Ok(None)` when nothing has
    /// been generated yet.
    pub async fn save(
        &self,
        downloader: &VideoDownloader,
        dir: &Path,
    ) -> Result<Option<PathBuf>, DownloadError> {
        let Some(result) = self.store.get() else {
            return Ok(None);
        };
        downloader.save_to_dir(result.video(), dir).await.map(Some)
    }

    /// Drops the current result so the editor is shown again. The script
    /// text is kept.
    pub fn start_over(&self) -> Result<(), MutationError> {
        self.mutation.reset()?;
        self.store.clear();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditView {
    Empty,
    Loaded(Arc<GenerationResult>),
}

pub struct EditPage {
    store: Arc<ResultStore>,
}

impl EditPage {
    pub fn new(store: Arc<ResultStore>) -> Self {
        Self { store }
    }

    pub fn view(&self) -> EditView {
        match self.store.get() {
            Some(result) => EditView::Loaded(result),
            None => EditView::Empty,
        }
    }

    pub fn back(&self, navigator: &mut Navigator) {
        navigator.navigate(Route::Generate);
    }
}

#[cfg(test)]
#[path = "tests/pages_tests.rs"]
mod tests;
