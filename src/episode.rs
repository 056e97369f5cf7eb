//! The episode entity and the filter/enrich step that produces it.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::article::ArticleRecord;
use crate::duration::EpisodeDuration;
use crate::probe::AttachmentLocator;
use crate::resolver::{FieldSkip, MetadataResolver};

/// An article enriched with resolved podcast attachment metadata,
/// eligible for feed inclusion. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    pub published: DateTime<Utc>,
    pub slug: String,
    /// Canonical URL of the rendered article page.
    pub link: String,
    pub summary: Option<String>,
    /// Enclosure URL published in the feed. Always a URL, never a
    /// filesystem path, for local attachments included.
    pub attachment_url: Url,
    /// Enclosure byte length, or omitted.
    pub length: Option<u64>,
    /// Playback duration, or omitted.
    pub duration: Option<EpisodeDuration>,
    /// Per-episode overrides of channel-level presentation fields,
    /// sourced from article metadata.
    pub author: Option<String>,
    pub subtitle: Option<String>,
    pub image: Option<String>,
}

/// Outcome of offering one article to the builder.
///
/// Modeled as a tagged outcome rather than an article subtype: most
/// articles are simply not episodes, and that is not an error.
#[derive(Debug)]
pub enum BuildOutcome {
    /// The article is an episode; any probe failures that degraded to
    /// field omission ride along as informational skips.
    Episode(Box<Episode>, Vec<FieldSkip>),
    /// The article carries no podcast attachment and is not part of the
    /// feed.
    NotAnEpisode,
    /// The article claims to be an episode but cannot be published:
    /// unusable attachment reference or malformed explicit metadata.
    /// The build continues without it.
    Excluded { reason: String },
}

/// Filters articles down to episodes and enriches them with resolved
/// metadata.
#[derive(Debug, Clone)]
pub struct EpisodeRecordBuilder {
    locator: AttachmentLocator,
    resolver: MetadataResolver,
}

impl EpisodeRecordBuilder {
    pub fn new(locator: AttachmentLocator, resolver: MetadataResolver) -> Self {
        Self { locator, resolver }
    }

    /// Build an episode from one article.
    ///
    /// Never fails the build: every problem is folded into the returned
    /// [`BuildOutcome`].
    pub async fn build(&self, article: &ArticleRecord) -> BuildOutcome {
        let Some(attachment_ref) = article.attachment_ref() else {
            return BuildOutcome::NotAnEpisode;
        };

        let handle = match self.locator.classify(attachment_ref) {
            Ok(handle) => handle,
            Err(e) => {
                return BuildOutcome::Excluded {
                    reason: e.to_string(),
                };
            }
        };

        let resolution = self
            .resolver
            .resolve(&handle, article.explicit_length(), article.explicit_duration())
            .await;

        let (resolved, skips) = match resolution {
            Ok(outcome) => outcome,
            Err(e) => {
                return BuildOutcome::Excluded {
                    reason: e.to_string(),
                };
            }
        };

        let episode = Episode {
            title: article.title.clone(),
            published: article.published,
            slug: article.slug.clone(),
            link: article.url.clone(),
            summary: article.summary.clone(),
            attachment_url: handle.publish_url().clone(),
            length: resolved.length,
            duration: resolved.duration,
            author: article.meta("author").map(str::to_owned),
            subtitle: article.meta("subtitle").map(str::to_owned),
            image: article.meta("image").map(str::to_owned),
        };

        BuildOutcome::Episode(Box::new(episode), skips)
    }
}
