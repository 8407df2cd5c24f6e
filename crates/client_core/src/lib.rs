use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use url::Url;

pub mod download;
pub mod mutation;
pub mod pages;
pub mod store;
pub mod transport;

pub use download::{download_file_name, DownloadError, VideoDownloader};
pub use mutation::{
    FailureKind, GenerationFailure, GenerationMutation, MutationError, MutationState, MutationStatus,
};
pub use pages::{EditPage, EditView, GeneratePage, GenerateView, Navigator, Route};
pub use store::ResultStore;
pub use transport::{GenerationTransport, HttpTransport, TransportError};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: Url,
    pub download_dir: PathBuf,
}

impl ClientConfig {
    pub fn new(server_url: &str, download_dir: impl Into<PathBuf>) -> Result<Self> {
        let trimmed = server_url.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("server url must not be empty"));
        }
        let server_url =
            Url::parse(trimmed).with_context(|| format!("invalid server url '{trimmed}'"))?;
        if !matches!(server_url.scheme(), "http" | "https") {
            return Err(anyhow!(
                "server url must use http or https, got '{}'",
                server_url.scheme()
            ));
        }

        Ok(Self {
            server_url,
            download_dir: download_dir.into(),
        })
    }
}

/// Owns the client-side generation state and hands it to pages.
///
/// Both pages receive the same [`ResultStore`], so whatever the generate page
/// produced is what the edit page reads.
pub struct ClientContext {
    pub config: ClientConfig,
    pub store: Arc<ResultStore>,
    pub mutation: Arc<GenerationMutation>,
    pub downloader: VideoDownloader,
}

impl ClientContext {
    pub fn new(config: ClientConfig) -> Self {
        let transport = HttpTransport::new(config.server_url.clone());
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn GenerationTransport>) -> Self {
        let store = Arc::new(ResultStore::new());
        let mutation = Arc::new(GenerationMutation::new(transport, Arc::clone(&store)));
        Self {
            config,
            store,
            mutation,
            downloader: VideoDownloader::new(),
        }
    }

    pub fn generate_page(&self) -> GeneratePage {
        GeneratePage::new(Arc::clone(&self.mutation))
    }

    pub fn edit_page(&self) -> EditPage {
        EditPage::new(Arc::clone(&self.store))
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
