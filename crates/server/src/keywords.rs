use std::collections::HashMap;

pub const MAX_KEYWORDS: usize = 8;

const MIN_KEYWORD_CHARS: usize = 3;

// English and Indonesian function words; scripts arrive in both.
const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "also", "and", "are", "because", "been", "but", "can", "could",
    "for", "from", "had", "has", "have", "her", "his", "into", "its", "just", "more", "not",
    "our", "out", "she", "such", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "this", "those", "too", "very", "was", "were", "what", "when", "where",
    "which", "while", "who", "will", "with", "would", "you", "your", "adalah", "akan", "atau",
    "bagian", "dalam", "dan", "dari", "dengan", "di", "ini", "itu", "juga", "karena", "ke",
    "lebih", "namun", "oleh", "pada", "para", "satu", "sama", "serta", "sering", "untuk",
    "yang",
];

pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// Up to `max` content words of `text`, most frequent first; ties keep the
/// order of first appearance.
pub fn extract_keywords(text: &str, max: usize) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, token) in tokenize(text).enumerate() {
        if token.chars().count() < MIN_KEYWORD_CHARS
            || STOP_WORDS.contains(&token.as_str())
            || token.chars().all(|c| c.is_numeric())
        {
            continue;
        }
        counts.entry(token).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
        count_b.cmp(count_a).then(first_a.cmp(first_b))
    });
    ranked
        .into_iter()
        .take(max)
        .map(|(token, _)| token)
        .collect()
}

#[cfg(test)]
#[path = "tests/keywords_tests.rs"]
mod tests;
