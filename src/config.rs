//! Feed-level configuration from the host's `PODCAST_FEED_*` key set.
//!
//! The host pipeline owns configuration loading in general; this module
//! only understands the podcast feed table. A missing key falls back to
//! its default, unknown keys are accepted with a warning, and the single
//! fatal condition of the whole build is [`FeedConfig::validate`]
//! failing (a feed without a path or title cannot be written anywhere).
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required feed-level key is missing or empty. This aborts feed
    /// generation before any episode is processed.
    #[error("Missing required feed setting: {0}")]
    MissingField(&'static str),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// The iTunes explicit-content flag, serialized as `Yes`/`No` to match
/// the values podcast directories expect verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplicitFlag {
    Yes,
    No,
}

impl fmt::Display for ExplicitFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplicitFlag::Yes => f.write_str("Yes"),
            ExplicitFlag::No => f.write_str("No"),
        }
    }
}

/// Feed-level settings, immutable for the duration of a build.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified; [`FeedConfig::validate`] enforces the required ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Output path of the feed document, relative to the site output root.
    #[serde(rename = "PODCAST_FEED_PATH")]
    pub path: String,

    /// Feed title.
    #[serde(rename = "PODCAST_FEED_TITLE")]
    pub title: String,

    /// iTunes explicit-content flag.
    #[serde(rename = "PODCAST_FEED_EXPLICIT")]
    pub explicit: Option<ExplicitFlag>,

    /// Feed language code (e.g. `en`, `ja`).
    #[serde(rename = "PODCAST_FEED_LANGUAGE")]
    pub language: Option<String>,

    /// Copyright string.
    #[serde(rename = "PODCAST_FEED_COPYRIGHT")]
    pub copyright: Option<String>,

    /// Feed subtitle.
    #[serde(rename = "PODCAST_FEED_SUBTITLE")]
    pub subtitle: Option<String>,

    /// Feed author, shown as `itunes:author`.
    #[serde(rename = "PODCAST_FEED_AUTHOR")]
    pub author: Option<String>,

    /// Feed summary, shown as `itunes:summary` and the channel description.
    #[serde(rename = "PODCAST_FEED_SUMMARY")]
    pub summary: Option<String>,

    /// Artwork URL for `itunes:image`.
    #[serde(rename = "PODCAST_FEED_IMAGE")]
    pub image: Option<String>,

    /// Feed owner name (paired with `owner_email` under `itunes:owner`).
    #[serde(rename = "PODCAST_FEED_OWNER_NAME")]
    pub owner_name: Option<String>,

    /// Feed owner contact email.
    #[serde(rename = "PODCAST_FEED_OWNER_EMAIL")]
    pub owner_email: Option<String>,

    /// Ordered category list; the first entry is the top-level iTunes
    /// category, the rest nest beneath it.
    #[serde(rename = "PODCAST_FEED_CATEGORY")]
    pub categories: Vec<String>,
}

impl FeedConfig {
    const KNOWN_KEYS: [&'static str; 12] = [
        "PODCAST_FEED_PATH",
        "PODCAST_FEED_TITLE",
        "PODCAST_FEED_EXPLICIT",
        "PODCAST_FEED_LANGUAGE",
        "PODCAST_FEED_COPYRIGHT",
        "PODCAST_FEED_SUBTITLE",
        "PODCAST_FEED_AUTHOR",
        "PODCAST_FEED_SUMMARY",
        "PODCAST_FEED_IMAGE",
        "PODCAST_FEED_OWNER_NAME",
        "PODCAST_FEED_OWNER_EMAIL",
        "PODCAST_FEED_CATEGORY",
    ];

    /// Load feed settings from a TOML file.
    ///
    /// - Missing file → `Err(ConfigError::Io)` (a podcast feed build was
    ///   requested; silently producing nothing would hide the mistake)
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    ///
    /// The result has not been validated; call [`FeedConfig::validate`]
    /// before handing it to the pipeline.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), title = %config.title, "Loaded podcast feed configuration");
        Ok(config)
    }

    /// Parse feed settings from a TOML string (the host may already hold
    /// its settings in memory rather than in a standalone file).
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        // Parse as a raw table first to warn about probable typos
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in podcast feed configuration, ignoring");
                }
            }
        }

        Ok(toml::from_str(content)?)
    }

    /// Check the required feed-level fields.
    ///
    /// `PODCAST_FEED_PATH` and `PODCAST_FEED_TITLE` must be non-empty;
    /// everything else is optional and omitted from the feed when unset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::MissingField("PODCAST_FEED_PATH"));
        }
        if self.title.trim().is_empty() {
            return Err(ConfigError::MissingField("PODCAST_FEED_TITLE"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let content = r#"
PODCAST_FEED_PATH = "feeds/podcast.xml"
PODCAST_FEED_TITLE = "My Show"
PODCAST_FEED_EXPLICIT = "No"
PODCAST_FEED_LANGUAGE = "ja"
PODCAST_FEED_COPYRIGHT = "2024 Example"
PODCAST_FEED_SUBTITLE = "A show about things"
PODCAST_FEED_AUTHOR = "Jane Host"
PODCAST_FEED_SUMMARY = "Long-form summary."
PODCAST_FEED_IMAGE = "https://example.com/art.jpg"
PODCAST_FEED_OWNER_NAME = "Jane Host"
PODCAST_FEED_OWNER_EMAIL = "jane@example.com"
PODCAST_FEED_CATEGORY = ["Leisure", "Hobbies"]
"#;
        let config = FeedConfig::from_toml_str(content).unwrap();
        assert_eq!(config.path, "feeds/podcast.xml");
        assert_eq!(config.title, "My Show");
        assert_eq!(config.explicit, Some(ExplicitFlag::No));
        assert_eq!(config.language.as_deref(), Some("ja"));
        assert_eq!(config.categories, vec!["Leisure", "Hobbies"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let content = r#"
PODCAST_FEED_PATH = "feeds/podcast.xml"
PODCAST_FEED_TITLE = "My Show"
"#;
        let config = FeedConfig::from_toml_str(content).unwrap();
        assert!(config.explicit.is_none());
        assert!(config.owner_name.is_none());
        assert!(config.categories.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_path_fails_validation() {
        let config = FeedConfig::from_toml_str(r#"PODCAST_FEED_TITLE = "My Show""#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("PODCAST_FEED_PATH")));
    }

    #[test]
    fn test_missing_title_fails_validation() {
        let config =
            FeedConfig::from_toml_str(r#"PODCAST_FEED_PATH = "feeds/podcast.xml""#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("PODCAST_FEED_TITLE")));
    }

    #[test]
    fn test_whitespace_only_title_fails_validation() {
        let content = "PODCAST_FEED_PATH = \"feeds/p.xml\"\nPODCAST_FEED_TITLE = \"  \"\n";
        let config = FeedConfig::from_toml_str(content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let content = r#"
PODCAST_FEED_PATH = "feeds/podcast.xml"
PODCAST_FEED_TITLE = "My Show"
PODCAST_FEED_TYPO_KEY = "should not fail"
"#;
        let config = FeedConfig::from_toml_str(content).unwrap();
        assert_eq!(config.title, "My Show");
    }

    #[test]
    fn test_invalid_explicit_value_is_parse_error() {
        let content = r#"
PODCAST_FEED_PATH = "feeds/podcast.xml"
PODCAST_FEED_TITLE = "My Show"
PODCAST_FEED_EXPLICIT = "Maybe"
"#;
        let result = FeedConfig::from_toml_str(content);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = FeedConfig::from_toml_str("this is not [valid toml");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = FeedConfig::load(Path::new("/tmp/podfeed_test_nonexistent_config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_explicit_flag_display() {
        assert_eq!(ExplicitFlag::Yes.to_string(), "Yes");
        assert_eq!(ExplicitFlag::No.to_string(), "No");
    }
}
