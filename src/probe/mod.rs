//! Attachment classification and metadata probing.
//!
//! An attachment reference from article front matter is either a remote
//! URL or a path under the site's content root. This module resolves the
//! reference into an [`AttachmentHandle`] and answers the two questions
//! the feed needs: how many bytes is it, and how long does it play.
//!
//! - [`locator`] - Local/Remote classification and publish-URL derivation
//! - [`remote`] - header-only HTTP length probe with a bounded timeout
//! - [`media`] - media-container duration probe for local files

mod locator;
mod media;
mod remote;

pub use locator::{AttachmentHandle, AttachmentLocator, ClassifyError};

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by attachment probes.
///
/// Every variant here is recoverable at the resolution layer: a failed
/// probe for a field the author did not supply explicitly degrades to
/// omitting that field from the feed entry.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A local attachment path does not exist (or is not a regular file).
    #[error("attachment not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The attachment could not be read: a remote request failed after
    /// the single permitted retry, or a local read was interrupted.
    #[error("attachment unreachable: {0}")]
    Unreachable(String),
    /// The server answered but did not report a content length.
    #[error("server did not report a content length")]
    LengthUnavailable,
    /// No playback duration could be determined. Always the case for
    /// remote attachments, which are never downloaded.
    #[error("no playback duration available")]
    DurationUnavailable,
    /// A local attachment's container format could not be parsed.
    #[error("unsupported media format: {0}")]
    UnsupportedFormat(String),
}
