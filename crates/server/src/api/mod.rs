use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::{DateTime, Local};
use shared::{
    domain::{
        ClipArtifact, GeneratedMedia, GenerationResult, MediaArtifact, VideoArtifact,
    },
    error::{ApiError, ErrorCode},
    protocol::MEDIA_ROUTE_PREFIX,
};

use crate::{
    catalog::best_match,
    config::Settings,
    keywords::{extract_keywords, MAX_KEYWORDS},
};

pub const VOICEOVER_FILE: &str = "output.wav";
pub const SUBTITLE_FILE: &str = "output.srt";
pub const VIDEO_FILE: &str = "output.mp4";
pub const SUCCESS_MESSAGE: &str = "Voiceover, subtitle, and video generated.";

#[derive(Debug, Clone)]
pub struct ApiContext {
    pub public_url: String,
    pub media_dir: PathBuf,
    pub max_script_chars: usize,
    pub sample_video: Option<PathBuf>,
}

impl ApiContext {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            public_url: settings.public_base_url(),
            media_dir: settings.media_dir.clone(),
            max_script_chars: settings.max_script_chars,
            sample_video: settings.sample_video.clone(),
        }
    }

    fn media_url(&self, folder: &str, file: &str) -> String {
        format!("{}{MEDIA_ROUTE_PREFIX}/{folder}/{file}", self.public_url)
    }
}

pub fn output_folder_name(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Builds the generation answer for `text` without rendering any media.
pub fn generate_dummy(
    ctx: &ApiContext,
    text: &str,
    now: DateTime<Local>,
) -> Result<GenerationResult, ApiError> {
    let started = Instant::now();
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::validation("text must not be empty"));
    }
    let chars = text.chars().count();
    if chars > ctx.max_script_chars {
        return Err(ApiError::validation(format!(
            "text is {chars} characters long; the limit is {}",
            ctx.max_script_chars
        )));
    }

    let folder = output_folder_name(now);
    let keywords = extract_keywords(text, MAX_KEYWORDS);
    let clips = (1..=keywords.len().max(1))
        .map(|index| {
            let name = format!("clip_{index}.mp4");
            ClipArtifact {
                url: ctx.media_url(&folder, &name),
                name,
            }
        })
        .collect();
    let relevant_videos = best_match(&keywords);

    Ok(GenerationResult {
        message: SUCCESS_MESSAGE.to_string(),
        result: GeneratedMedia {
            voiceover: MediaArtifact {
                name: VOICEOVER_FILE.to_string(),
                url: ctx.media_url(&folder, VOICEOVER_FILE),
            },
            subtitle: MediaArtifact {
                name: SUBTITLE_FILE.to_string(),
                url: ctx.media_url(&folder, SUBTITLE_FILE),
            },
            video: VideoArtifact {
                name: VIDEO_FILE.to_string(),
                url: ctx.media_url(&folder, VIDEO_FILE),
                clips,
            },
        },
        keywords,
        relevant_videos,
        execution_time: started.elapsed().as_secs_f64(),
    })
}

/// Minimal `ftyp` box, enough for players and sniffers to see an mp4.
const STUB_MP4: &[u8] = &[
    0x00, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p', b'i', b's', b'o', b'm', 0x00, 0x00, 0x02,
    0x00, b'i', b's', b'o', b'm', b'm', b'p', b'4', b'1',
];

/// Validates `text`, then writes every artifact the answer links to so the
/// media route can serve them.
pub async fn generate(
    ctx: &ApiContext,
    text: &str,
    now: DateTime<Local>,
) -> Result<GenerationResult, ApiError> {
    let result = generate_dummy(ctx, text, now)?;
    write_artifacts(ctx, &output_folder_name(now), text.trim(), &result).await?;
    Ok(result)
}

async fn write_artifacts(
    ctx: &ApiContext,
    folder: &str,
    text: &str,
    result: &GenerationResult,
) -> Result<(), ApiError> {
    let internal = |err: std::io::Error| ApiError::new(ErrorCode::Internal, err.to_string());
    let dir = ctx.media_dir.join(folder);
    tokio::fs::create_dir_all(&dir).await.map_err(internal)?;

    let video = match &ctx.sample_video {
        Some(path) => tokio::fs::read(path).await.map_err(|err| {
            ApiError::new(
                ErrorCode::Internal,
                format!("cannot read sample video {}: {err}", path.display()),
            )
        })?,
        None => STUB_MP4.to_vec(),
    };

    tokio::fs::write(dir.join(VOICEOVER_FILE), silent_wav())
        .await
        .map_err(internal)?;
    tokio::fs::write(dir.join(SUBTITLE_FILE), subtitle_for(text))
        .await
        .map_err(internal)?;
    tokio::fs::write(dir.join(VIDEO_FILE), &video)
        .await
        .map_err(internal)?;
    for clip in &result.result.video.clips {
        tokio::fs::write(dir.join(&clip.name), &video)
            .await
            .map_err(internal)?;
    }
    Ok(())
}

/// One cue holding the whole script.
fn subtitle_for(text: &str) -> String {
    format!("1\n00:00:00,000 --> 00:00:05,000\n{text}\n")
}

/// 16 kHz mono 16-bit WAV header with no samples.
fn silent_wav() -> Vec<u8> {
    const SAMPLE_RATE: u32 = 16_000;
    let mut wav = Vec::with_capacity(44);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&36u32.to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&0u32.to_le_bytes());
    wav
}

pub async fn read_media(ctx: &ApiContext, folder: &str, file: &str) -> Result<Vec<u8>, ApiError> {
    if !is_plain_component(folder) || !is_plain_component(file) {
        return Err(ApiError::validation("invalid media path"));
    }

    let path = ctx.media_dir.join(folder).join(file);
    tokio::fs::read(&path).await.map_err(|err| match err.kind() {
        ErrorKind::NotFound => ApiError::new(ErrorCode::NotFound, "media not found"),
        _ => ApiError::new(ErrorCode::Internal, err.to_string()),
    })
}

pub fn content_type_for(file: &str) -> &'static str {
    match Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("mp4") => "video/mp4",
        Some("wav") => "audio/wav",
        Some("srt") => "application/x-subrip",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

fn is_plain_component(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
