//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

pub enum BackendCommand {
    Generate { text: String },
    SaveVideo { url: String, target: PathBuf },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generate { .. } => "generate",
            Self::SaveVideo { .. } => "save_video",
        }
    }
}
