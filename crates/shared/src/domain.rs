use serde::{Deserialize, Serialize};

/// Fallback file name used when the backend leaves `video.name` empty.
pub const DEFAULT_VIDEO_FILE_NAME: &str = "video.mp4";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaArtifact {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipArtifact {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoArtifact {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub clips: Vec<ClipArtifact>,
}

impl VideoArtifact {
    /// Name the artifact should be saved under.
    pub fn file_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            DEFAULT_VIDEO_FILE_NAME
        } else {
            name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedMedia {
    pub voiceover: MediaArtifact,
    pub subtitle: MediaArtifact,
    pub video: VideoArtifact,
}

/// Stock footage entry matched against the script keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockVideoMatch {
    pub source: String,
    pub keyword: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub similarity_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub message: String,
    /// Seconds spent by the backend producing the result.
    pub execution_time: f64,
    pub result: GeneratedMedia,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub relevant_videos: StockVideoMatch,
}

impl GenerationResult {
    pub fn video(&self) -> &VideoArtifact {
        &self.result.video
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_payload_with_nullable_stock_fields() {
        let raw = serde_json::json!({
            "message": "ok",
            "execution_time": 1.25,
            "result": {
                "voiceover": { "name": "output.wav", "url": "https://x/output.wav" },
                "subtitle": { "name": "output.srt", "url": "https://x/output.srt" },
                "video": {
                    "name": "output.mp4",
                    "url": "https://x/output.mp4",
                    "clips": [
                        { "name": "clip_1.mp4", "url": "https://x/clip_1.mp4" },
                        { "name": "clip_2.mp4", "url": "https://x/clip_2.mp4" }
                    ]
                }
            },
            "keywords": ["countryside"],
            "relevant_videos": {
                "source": "pexels",
                "keyword": "countryside",
                "description": null,
                "url": "https://stock/1.mp4",
                "duration": 12.0,
                "width": 1920,
                "height": 1080,
                "thumbnail": null,
                "similarity_score": 0.5
            }
        });

        let result: GenerationResult = serde_json::from_value(raw).expect("result");
        assert_eq!(result.video().clips.len(), 2);
        assert_eq!(result.video().clips[1].name, "clip_2.mp4");
        assert_eq!(result.relevant_videos.description, None);
        assert_eq!(result.relevant_videos.width, Some(1920.0));
    }

    #[test]
    fn empty_video_name_falls_back_to_default() {
        let video = VideoArtifact {
            name: " ".to_string(),
            url: "https://x/video.mp4".to_string(),
            clips: Vec::new(),
        };
        assert_eq!(video.file_name(), DEFAULT_VIDEO_FILE_NAME);
    }
}
