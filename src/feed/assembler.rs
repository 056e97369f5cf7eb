use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::config::FeedConfig;
use crate::duration::EpisodeDuration;
use crate::episode::Episode;

/// MIME types podcast clients are known to handle, keyed by file
/// extension.
const SUPPORTED_MEDIA_TYPES: [(&str, &str); 6] = [
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/x-m4a"),
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("pdf", "application/pdf"),
];

/// The enclosure block of a feed entry.
///
/// `length` and `mime_type` are omitted (not zero, not empty) when they
/// could not be determined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enclosure {
    pub url: Url,
    pub length: Option<u64>,
    pub mime_type: Option<String>,
}

/// One fully assembled feed entry, ready for envelope serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub guid: String,
    pub description: Option<String>,
    pub published: DateTime<Utc>,
    pub enclosure: Enclosure,
    pub duration: Option<EpisodeDuration>,
    pub author: Option<String>,
    pub subtitle: Option<String>,
    pub image: Option<String>,
}

/// The assembled feed: entries in input order plus the channel-level
/// context the host applies uniformly when serializing the envelope.
#[derive(Debug, Clone)]
pub struct AssembledFeed {
    pub channel: FeedConfig,
    pub entries: Vec<FeedEntry>,
}

/// Maps episodes to feed entries.
///
/// Strictly order-preserving: no sorting, no deduplication, no
/// pagination — those belong to the host pipeline.
#[derive(Debug, Clone)]
pub struct FeedAssembler {
    config: FeedConfig,
}

impl FeedAssembler {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    pub fn assemble(&self, episodes: Vec<Episode>) -> AssembledFeed {
        let entries = episodes.into_iter().map(entry_from_episode).collect();
        AssembledFeed {
            channel: self.config.clone(),
            entries,
        }
    }
}

fn entry_from_episode(episode: Episode) -> FeedEntry {
    let mime_type = media_type_for(&episode.attachment_url).map(str::to_owned);
    FeedEntry {
        // The article page URL doubles as the stable identifier, matching
        // feeds that predate explicit GUIDs
        guid: episode.link.clone(),
        title: episode.title,
        link: episode.link,
        description: episode.summary,
        published: episode.published,
        enclosure: Enclosure {
            url: episode.attachment_url,
            length: episode.length,
            mime_type,
        },
        duration: episode.duration,
        author: episode.author,
        subtitle: episode.subtitle,
        image: episode.image,
    }
}

fn media_type_for(url: &Url) -> Option<&'static str> {
    let ext = Path::new(url.path()).extension()?.to_str()?;
    SUPPORTED_MEDIA_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn episode(n: u32) -> Episode {
        Episode {
            title: format!("Episode {n}"),
            published: Utc.with_ymd_and_hms(2024, 3, n, 12, 0, 0).unwrap(),
            slug: format!("episode-{n}"),
            link: format!("https://example.com/episode-{n}.html"),
            summary: Some(format!("Summary {n}")),
            attachment_url: Url::parse(&format!("https://example.com/media/e{n}.mp3")).unwrap(),
            length: Some(1000 + n as u64),
            duration: Some(EpisodeDuration::from_secs(60 * n as u64)),
            author: None,
            subtitle: None,
            image: None,
        }
    }

    fn config() -> FeedConfig {
        FeedConfig {
            path: "feeds/podcast.xml".to_string(),
            title: "My Show".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_assemble_preserves_order() {
        let feed = FeedAssembler::new(config()).assemble(vec![episode(3), episode(1), episode(2)]);
        let titles: Vec<&str> = feed.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Episode 3", "Episode 1", "Episode 2"]);
    }

    #[test]
    fn test_channel_context_from_config() {
        let feed = FeedAssembler::new(config()).assemble(vec![episode(1)]);
        assert_eq!(feed.channel.title, "My Show");
        assert_eq!(feed.channel.path, "feeds/podcast.xml");
    }

    #[test]
    fn test_entry_fields_mapped() {
        let feed = FeedAssembler::new(config()).assemble(vec![episode(1)]);
        let entry = &feed.entries[0];
        assert_eq!(entry.link, "https://example.com/episode-1.html");
        assert_eq!(entry.guid, entry.link);
        assert_eq!(entry.enclosure.url.as_str(), "https://example.com/media/e1.mp3");
        assert_eq!(entry.enclosure.length, Some(1001));
        assert_eq!(entry.enclosure.mime_type.as_deref(), Some("audio/mpeg"));
        assert_eq!(entry.duration.unwrap().as_secs(), 60);
    }

    #[test]
    fn test_absent_metadata_stays_absent() {
        let mut ep = episode(1);
        ep.length = None;
        ep.duration = None;
        let feed = FeedAssembler::new(config()).assemble(vec![ep]);
        let entry = &feed.entries[0];
        assert!(entry.enclosure.length.is_none());
        assert!(entry.duration.is_none());
    }

    #[test]
    fn test_media_type_mapping() {
        let mime = |u: &str| media_type_for(&Url::parse(u).unwrap());
        assert_eq!(mime("https://x/e.mp3"), Some("audio/mpeg"));
        assert_eq!(mime("https://x/e.M4A"), Some("audio/x-m4a"));
        assert_eq!(mime("https://x/e.mov"), Some("video/quicktime"));
        assert_eq!(mime("https://x/e.ogg"), None);
        assert_eq!(mime("https://x/noext"), None);
    }
}
