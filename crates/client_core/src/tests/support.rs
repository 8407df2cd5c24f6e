use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::{
        ClipArtifact, GeneratedMedia, GenerationResult, MediaArtifact, StockVideoMatch,
        VideoArtifact,
    },
    protocol::{GenerationRequest, GENERATE_ROUTE},
};
use tokio::{net::TcpListener, sync::Semaphore};
use url::Url;

use crate::transport::{GenerationTransport, TransportError};

pub(crate) const VIDEO_BYTES: &[u8] = b"fake-mp4-bytes";

pub(crate) fn sample_result(video_url: &str, video_name: &str) -> GenerationResult {
    GenerationResult {
        message: "Video generated".to_string(),
        execution_time: 2.5,
        result: GeneratedMedia {
            voiceover: MediaArtifact {
                name: "output.wav".to_string(),
                url: "https://x/output.wav".to_string(),
            },
            subtitle: MediaArtifact {
                name: "output.srt".to_string(),
                url: "https://x/output.srt".to_string(),
            },
            video: VideoArtifact {
                name: video_name.to_string(),
                url: video_url.to_string(),
                clips: vec![
                    ClipArtifact {
                        name: "clip_1.mp4".to_string(),
                        url: "https://x/clip_1.mp4".to_string(),
                    },
                    ClipArtifact {
                        name: "clip_2.mp4".to_string(),
                        url: "https://x/clip_2.mp4".to_string(),
                    },
                ],
            },
        },
        keywords: vec!["countryside".to_string(), "rice paddies".to_string()],
        relevant_videos: StockVideoMatch {
            source: "pexels".to_string(),
            keyword: "countryside".to_string(),
            description: Some("green countryside field".to_string()),
            url: "https://stock/countryside.mp4".to_string(),
            duration: Some(14.0),
            width: Some(1920.0),
            height: Some(1080.0),
            thumbnail: None,
            similarity_score: Some(0.33),
        },
    }
}

pub(crate) fn temp_dir(label: &str) -> std::path::PathBuf {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    std::env::temp_dir().join(format!("client_core_{label}_{suffix}"))
}

/// Transport double that parks every call until the test releases it.
pub(crate) struct GatedTransport {
    reply: Result<GenerationResult, TransportError>,
    gate: Semaphore,
    calls: AtomicUsize,
    texts: std::sync::Mutex<Vec<String>>,
}

impl GatedTransport {
    pub(crate) fn succeeding(result: GenerationResult) -> Arc<Self> {
        Arc::new(Self::with_reply(Ok(result)))
    }

    pub(crate) fn failing(err: TransportError) -> Arc<Self> {
        Arc::new(Self::with_reply(Err(err)))
    }

    fn with_reply(reply: Result<GenerationResult, TransportError>) -> Self {
        Self {
            reply,
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
            texts: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Lets the transport answer immediately from now on.
    pub(crate) fn open(self: &Arc<Self>) -> Arc<Self> {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
        Arc::clone(self)
    }

    pub(crate) fn release_one(&self) {
        self.gate.add_permits(1);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn texts(&self) -> Vec<String> {
        self.texts.lock().expect("texts").clone()
    }
}

#[async_trait]
impl GenerationTransport for GatedTransport {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts
            .lock()
            .expect("texts")
            .push(request.text.clone());
        let permit = self.gate.acquire().await.expect("gate open");
        permit.forget();
        self.reply.clone()
    }
}

type Reply = (StatusCode, serde_json::Value);

#[derive(Clone)]
struct MockState {
    reply: Arc<std::sync::Mutex<Reply>>,
    calls: Arc<AtomicUsize>,
    requests: Arc<std::sync::Mutex<Vec<GenerationRequest>>>,
}

pub(crate) struct MockBackend {
    pub(crate) base_url: String,
    reply: Arc<std::sync::Mutex<Reply>>,
    calls: Arc<AtomicUsize>,
    requests: Arc<std::sync::Mutex<Vec<GenerationRequest>>>,
}

impl MockBackend {
    pub(crate) fn url(&self) -> Url {
        Url::parse(&self.base_url).expect("mock url")
    }

    pub(crate) fn media_url(&self, name: &str) -> String {
        format!("{}/files/{name}", self.base_url)
    }

    pub(crate) fn reply_with(&self, status: StatusCode, body: serde_json::Value) {
        *self.reply.lock().expect("reply") = (status, body);
    }

    pub(crate) fn reply_with_result(&self, result: &GenerationResult) {
        self.reply_with(StatusCode::OK, serde_json::to_value(result).expect("json"));
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("requests").clone()
    }
}

/// Serves `POST /generate-dummy` with the configured reply and
/// `GET /files/:name` with [`VIDEO_BYTES`] (404 for `missing.mp4`).
pub(crate) async fn spawn_backend() -> MockBackend {
    let reply = Arc::new(std::sync::Mutex::new((
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({ "message": "no reply configured" }),
    )));
    let calls = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(std::sync::Mutex::new(Vec::new()));
    let state = MockState {
        reply: Arc::clone(&reply),
        calls: Arc::clone(&calls),
        requests: Arc::clone(&requests),
    };

    async fn generate(
        State(state): State<MockState>,
        Json(req): Json<GenerationRequest>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        state.calls.fetch_add(1, Ordering::SeqCst);
        state.requests.lock().expect("requests").push(req);
        let (status, body) = state.reply.lock().expect("reply").clone();
        (status, Json(body))
    }

    async fn file(Path(name): Path<String>) -> Result<Vec<u8>, StatusCode> {
        if name == "missing.mp4" {
            return Err(StatusCode::NOT_FOUND);
        }
        Ok(VIDEO_BYTES.to_vec())
    }

    let app = Router::new()
        .route(GENERATE_ROUTE, post(generate))
        .route("/files/:name", get(file))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    MockBackend {
        base_url: format!("http://{addr}"),
        reply,
        calls,
        requests,
    }
}
