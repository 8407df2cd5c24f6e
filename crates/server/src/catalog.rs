//! Built-in stock footage catalog and keyword matching.

use std::collections::HashSet;

use shared::domain::StockVideoMatch;

use crate::keywords::tokenize;

pub struct StockClip {
    pub source: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub duration: f64,
    pub width: f64,
    pub height: f64,
    pub thumbnail: &'static str,
}

pub const STOCK_CLIPS: &[StockClip] = &[
    StockClip {
        source: "pexels",
        description: "tranquil countryside village morning",
        url: "https://videos.pexels.com/video-files/3015510/tranquil-countryside-village.mp4",
        duration: 18.0,
        width: 1920.0,
        height: 1080.0,
        thumbnail: "https://images.pexels.com/videos/3015510/thumbnail.jpeg",
    },
    StockClip {
        source: "pixabay",
        description: "lush green rice paddies field",
        url: "https://cdn.pixabay.com/video/2020/05/14/rice-paddies-field.mp4",
        duration: 22.0,
        width: 1280.0,
        height: 720.0,
        thumbnail: "https://cdn.pixabay.com/video/2020/05/14/rice-paddies-field.jpg",
    },
    StockClip {
        source: "pexels",
        description: "birds singing forest sunrise",
        url: "https://videos.pexels.com/video-files/1409899/birds-forest-sunrise.mp4",
        duration: 15.0,
        width: 1920.0,
        height: 1080.0,
        thumbnail: "https://images.pexels.com/videos/1409899/thumbnail.jpeg",
    },
    StockClip {
        source: "pixabay",
        description: "rain falling soil garden",
        url: "https://cdn.pixabay.com/video/2019/10/09/rain-soil-garden.mp4",
        duration: 12.0,
        width: 1920.0,
        height: 1080.0,
        thumbnail: "https://cdn.pixabay.com/video/2019/10/09/rain-soil-garden.jpg",
    },
    StockClip {
        source: "pexels",
        description: "busy city street traffic night",
        url: "https://videos.pexels.com/video-files/2034115/city-street-night.mp4",
        duration: 20.0,
        width: 3840.0,
        height: 2160.0,
        thumbnail: "https://images.pexels.com/videos/2034115/thumbnail.jpeg",
    },
];

/// Jaccard similarity of the word sets of two texts; 0.0 when either is empty.
pub fn similarity_score(source_text: &str, reference_text: &str) -> f64 {
    let source: HashSet<String> = tokenize(source_text).collect();
    let reference: HashSet<String> = tokenize(reference_text).collect();
    if source.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let intersection = source.intersection(&reference).count();
    let union = source.union(&reference).count();
    intersection as f64 / union as f64
}

/// Highest-scoring catalog clip over all keywords. Earlier keywords and
/// earlier clips win ties.
pub fn best_match(keywords: &[String]) -> StockVideoMatch {
    let mut best: Option<(&StockClip, &str, f64)> = None;
    for keyword in keywords {
        for clip in STOCK_CLIPS {
            let score = similarity_score(clip.description, keyword);
            if best.map_or(true, |(_, _, best_score)| score > best_score) {
                best = Some((clip, keyword.as_str(), score));
            }
        }
    }

    let (clip, keyword, score) = best.unwrap_or((&STOCK_CLIPS[0], "", 0.0));
    StockVideoMatch {
        source: clip.source.to_string(),
        keyword: keyword.to_string(),
        description: Some(clip.description.to_string()),
        url: clip.url.to_string(),
        duration: Some(clip.duration),
        width: Some(clip.width),
        height: Some(clip.height),
        thumbnail: Some(clip.thumbnail.to_string()),
        similarity_score: Some(score),
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
