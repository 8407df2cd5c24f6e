use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_bind: String,
    pub server_public_url: Option<String>,
    pub media_dir: PathBuf,
    pub max_script_chars: usize,
    /// Video copied into every output folder; a stub mp4 is written without it.
    pub sample_video: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8000".into(),
            server_public_url: None,
            media_dir: PathBuf::from("./storage"),
            max_script_chars: 5_000,
            sample_video: None,
        }
    }
}

impl Settings {
    /// Base URL media links are rooted at, without a trailing slash.
    pub fn public_base_url(&self) -> String {
        match &self.server_public_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => format!("http://{}", self.server_bind),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new("server.toml"), |name| std::env::var(name).ok())
}

/// Defaults, then `path` (if readable), then environment overrides.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<toml::Table>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, &file_cfg),
            Err(err) => warn!(path = %path.display(), %err, "ignoring unparsable settings file"),
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("SERVER_PUBLIC_URL") {
        settings.server_public_url = Some(v);
    }
    if let Some(v) = env("APP__PUBLIC_URL") {
        settings.server_public_url = Some(v);
    }

    if let Some(v) = env("APP__MEDIA_DIR") {
        settings.media_dir = PathBuf::from(v);
    }

    if let Some(v) = env("APP__SAMPLE_VIDEO") {
        settings.sample_video = Some(PathBuf::from(v));
    }

    if let Some(v) = env("APP__MAX_SCRIPT_CHARS") {
        match v.parse::<usize>() {
            Ok(parsed) if parsed > 0 => settings.max_script_chars = parsed,
            _ => warn!(value = %v, "ignoring invalid APP__MAX_SCRIPT_CHARS"),
        }
    }

    settings
}

fn apply_file(settings: &mut Settings, file_cfg: &toml::Table) {
    if let Some(v) = file_cfg.get("bind_addr").and_then(|v| v.as_str()) {
        settings.server_bind = v.to_string();
    }
    if let Some(v) = file_cfg.get("public_url").and_then(|v| v.as_str()) {
        settings.server_public_url = Some(v.to_string());
    }
    if let Some(v) = file_cfg.get("media_dir").and_then(|v| v.as_str()) {
        settings.media_dir = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.get("sample_video").and_then(|v| v.as_str()) {
        settings.sample_video = Some(PathBuf::from(v));
    }
    if let Some(v) = file_cfg.get("max_script_chars").and_then(|v| v.as_integer()) {
        if let Ok(parsed) = usize::try_from(v) {
            if parsed > 0 {
                settings.max_script_chars = parsed;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
