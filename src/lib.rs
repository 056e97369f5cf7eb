//! Podcast feed generation core for static-site pipelines.
//!
//! A host site generator hands this crate its parsed articles and its
//! `PODCAST_FEED_*` settings; the crate decides which articles are
//! podcast episodes, resolves each episode's enclosure metadata, and
//! hands back an ordered sequence of feed entries for the host to
//! serialize into its feed envelope.
//!
//! The interesting part is metadata resolution. Authors may declare an
//! attachment as a local path or a remote URL and may or may not supply
//! the enclosure byte length and playback duration explicitly. Each
//! field resolves through the same chain — explicit value, then a probe
//! (filesystem stat / media-container parse for local files, a
//! header-only HTTP request for remote ones), then graceful omission —
//! so a missing value degrades the entry instead of failing the build.
//!
//! # Example
//!
//! ```ignore
//! use podfeed::{FeedConfig, FeedPipeline, PipelineOptions, SiteContext};
//!
//! let config = FeedConfig::load(&settings_path)?;
//! let pipeline = FeedPipeline::new(config, site, client, PipelineOptions::default())?;
//! let report = pipeline.generate(&articles).await;
//! for entry in &report.feed.entries {
//!     envelope.push_str(&podfeed::feed::render_item(entry)?);
//! }
//! ```

pub mod article;
pub mod config;
pub mod duration;
pub mod episode;
pub mod feed;
pub mod pipeline;
pub mod probe;
pub mod resolver;

pub use article::ArticleRecord;
pub use config::{ConfigError, ExplicitFlag, FeedConfig};
pub use duration::EpisodeDuration;
pub use episode::{BuildOutcome, Episode, EpisodeRecordBuilder};
pub use feed::{AssembledFeed, Enclosure, FeedAssembler, FeedEntry};
pub use pipeline::{
    BuildReport, ExcludedEpisode, FeedPipeline, PipelineOptions, SiteContext, SkippedField,
};
pub use probe::{AttachmentHandle, AttachmentLocator, ClassifyError, ProbeError};
pub use resolver::{FieldSkip, InvalidMetadataValue, MetadataField, MetadataResolver, ResolvedMetadata};
