//! Build orchestration: concurrent per-episode resolution with
//! input-order reassembly and best-effort skip reporting.
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::article::ArticleRecord;
use crate::config::{ConfigError, FeedConfig};
use crate::episode::{BuildOutcome, Episode, EpisodeRecordBuilder};
use crate::feed::{AssembledFeed, FeedAssembler};
use crate::probe::AttachmentLocator;
use crate::resolver::{MetadataField, MetadataResolver};

/// Default bound on concurrent per-episode resolutions.
const DEFAULT_CONCURRENCY: usize = 8;
/// Default per-attempt bound on a single network probe.
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Knobs for a build invocation. The defaults suit typical sites; raise
/// `concurrency` for feeds with many remote attachments.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Maximum number of episodes resolved concurrently.
    pub concurrency: usize,
    /// Per-attempt timeout for network probes.
    pub probe_timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// The host site properties attachment resolution depends on.
#[derive(Debug, Clone)]
pub struct SiteContext {
    /// Published root URL of the site.
    pub site_url: Url,
    /// Directory that article-relative attachment paths resolve under.
    pub content_root: PathBuf,
}

/// A field omitted from one entry, by article. Informational.
#[derive(Debug, Clone)]
pub struct SkippedField {
    pub slug: String,
    pub field: MetadataField,
    pub reason: String,
}

/// An episode excluded from the feed entirely, by article. Surfaced as
/// a build warning; the rest of the feed is unaffected.
#[derive(Debug, Clone)]
pub struct ExcludedEpisode {
    pub slug: String,
    pub reason: String,
}

/// Outcome of one build: the assembled feed plus everything that was
/// skipped along the way, for the host's warning output.
#[derive(Debug)]
pub struct BuildReport {
    pub feed: AssembledFeed,
    pub skipped_fields: Vec<SkippedField>,
    pub excluded: Vec<ExcludedEpisode>,
}

/// The podcast feed build pipeline.
///
/// One instance per build invocation; it owns no state beyond its
/// configuration and HTTP client, and articles flow through
/// [`FeedPipeline::generate`] without being retained.
#[derive(Debug, Clone)]
pub struct FeedPipeline {
    builder: EpisodeRecordBuilder,
    assembler: FeedAssembler,
    concurrency: usize,
}

impl FeedPipeline {
    /// Validates `config` up front: a feed missing its required settings
    /// aborts here, before any episode is processed.
    pub fn new(
        config: FeedConfig,
        site: SiteContext,
        client: reqwest::Client,
        options: PipelineOptions,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let locator = AttachmentLocator::new(site.site_url, site.content_root);
        let resolver = MetadataResolver::new(client, options.probe_timeout);

        Ok(Self {
            builder: EpisodeRecordBuilder::new(locator, resolver),
            assembler: FeedAssembler::new(config),
            concurrency: options.concurrency.max(1),
        })
    }

    /// Run one build over the host's article sequence.
    ///
    /// Episodes are resolved concurrently up to the configured bound,
    /// but the output entry order always matches the input article
    /// order: each resolution carries its input index and the results
    /// are reassembled by index once the pool drains. No single
    /// episode's failure is fatal.
    pub async fn generate(&self, articles: &[ArticleRecord]) -> BuildReport {
        let mut outcomes: Vec<(usize, BuildOutcome)> = stream::iter(articles.iter().enumerate())
            .map(|(idx, article)| async move { (idx, self.builder.build(article).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        outcomes.sort_by_key(|(idx, _)| *idx);

        let mut episodes: Vec<Episode> = Vec::new();
        let mut skipped_fields = Vec::new();
        let mut excluded = Vec::new();

        for (idx, outcome) in outcomes {
            let slug = articles[idx].slug.as_str();
            match outcome {
                BuildOutcome::Episode(episode, skips) => {
                    for skip in skips {
                        tracing::info!(
                            slug = slug,
                            field = %skip.field,
                            reason = %skip.reason,
                            "Omitting enclosure field"
                        );
                        skipped_fields.push(SkippedField {
                            slug: slug.to_string(),
                            field: skip.field,
                            reason: skip.reason,
                        });
                    }
                    episodes.push(*episode);
                }
                BuildOutcome::NotAnEpisode => {}
                BuildOutcome::Excluded { reason } => {
                    tracing::warn!(slug = slug, reason = %reason, "Excluding episode from feed");
                    excluded.push(ExcludedEpisode {
                        slug: slug.to_string(),
                        reason,
                    });
                }
            }
        }

        let feed = self.assembler.assemble(episodes);
        tracing::info!(
            entries = feed.entries.len(),
            skipped_fields = skipped_fields.len(),
            excluded = excluded.len(),
            "Assembled podcast feed"
        );

        BuildReport {
            feed,
            skipped_fields,
            excluded,
        }
    }
}
