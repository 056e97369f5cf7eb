use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Front-matter key that marks an article as a podcast episode.
pub const PODCAST_KEY: &str = "podcast";
/// Front-matter key for an explicit enclosure byte length.
pub const LENGTH_KEY: &str = "length";
/// Front-matter key for an explicit playback duration.
pub const DURATION_KEY: &str = "duration";

/// A parsed article handed in by the host pipeline.
///
/// The host's front-matter parser makes no casing guarantee for metadata
/// keys (`Podcast`, `Length`, `duration` all occur in the wild), so the
/// accessors here match keys case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Article title, already stripped of markup by the host.
    pub title: String,
    /// Publication timestamp.
    pub published: DateTime<Utc>,
    /// URL-safe article identifier, used in skip reporting.
    pub slug: String,
    /// Canonical URL of the rendered article page.
    pub url: String,
    /// Free-text summary/description, if the article has one.
    pub summary: Option<String>,
    /// Raw front-matter metadata as parsed by the host.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl ArticleRecord {
    /// Case-insensitive metadata lookup. Returns the first matching value;
    /// front-matter parsers do not produce duplicate keys in practice.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The declared attachment reference (path or URL), if this article
    /// is a podcast episode.
    pub fn attachment_ref(&self) -> Option<&str> {
        self.meta(PODCAST_KEY)
    }

    /// Explicitly supplied enclosure byte length, raw and unvalidated.
    pub fn explicit_length(&self) -> Option<&str> {
        self.meta(LENGTH_KEY)
    }

    /// Explicitly supplied playback duration, raw and unvalidated.
    pub fn explicit_duration(&self) -> Option<&str> {
        self.meta(DURATION_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article_with(meta: &[(&str, &str)]) -> ArticleRecord {
        ArticleRecord {
            title: "Episode 1".to_string(),
            published: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            slug: "episode-1".to_string(),
            url: "https://example.com/episode-1.html".to_string(),
            summary: None,
            metadata: meta
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_meta_is_case_insensitive() {
        let article = article_with(&[("Podcast", "ep.mp3"), ("Length", "1000"), ("duration", "12:34")]);
        assert_eq!(article.attachment_ref(), Some("ep.mp3"));
        assert_eq!(article.explicit_length(), Some("1000"));
        assert_eq!(article.explicit_duration(), Some("12:34"));
    }

    #[test]
    fn test_meta_all_lowercase() {
        let article = article_with(&[("podcast", "ep.mp3")]);
        assert_eq!(article.attachment_ref(), Some("ep.mp3"));
    }

    #[test]
    fn test_missing_keys_are_none() {
        let article = article_with(&[]);
        assert_eq!(article.attachment_ref(), None);
        assert_eq!(article.explicit_length(), None);
        assert_eq!(article.explicit_duration(), None);
    }
}
