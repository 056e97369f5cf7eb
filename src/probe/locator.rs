use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::{media, remote, ProbeError};
use crate::duration::EpisodeDuration;

/// Errors that can occur while classifying an attachment reference.
///
/// Unlike [`ProbeError`], these mean the reference itself is unusable:
/// no publish URL can be derived from it, so the episode cannot appear
/// in the feed at all.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The reference string was empty.
    #[error("attachment reference is empty")]
    Empty,
    /// The reference is an absolute URL with a scheme other than
    /// http/https (e.g. `file://`, `ftp://`).
    #[error("unsupported attachment scheme: {0}")]
    UnsupportedScheme(String),
    /// The reference could not be resolved to a publish URL.
    #[error("unusable attachment reference: {0}")]
    BadReference(String),
}

/// Resolved view of an episode attachment.
///
/// Carries everything later stages need: where to probe (a filesystem
/// path for local attachments, nothing for remote ones) and the URL to
/// publish in the enclosure. The publish URL is always a real URL, never
/// a filesystem path.
#[derive(Debug, Clone)]
pub enum AttachmentHandle {
    Local { path: PathBuf, publish_url: Url },
    Remote { url: Url },
}

impl AttachmentHandle {
    /// The URL published in the feed enclosure.
    pub fn publish_url(&self) -> &Url {
        match self {
            AttachmentHandle::Local { publish_url, .. } => publish_url,
            AttachmentHandle::Remote { url } => url,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, AttachmentHandle::Remote { .. })
    }

    /// Byte length of the attachment.
    ///
    /// Local: exact on-disk file size. Remote: a header-only request,
    /// bounded by `probe_timeout` per attempt with at most one retry.
    pub async fn probe_length(
        &self,
        client: &reqwest::Client,
        probe_timeout: Duration,
    ) -> Result<u64, ProbeError> {
        match self {
            AttachmentHandle::Local { path, .. } => match tokio::fs::metadata(path).await {
                Ok(meta) if meta.is_file() => Ok(meta.len()),
                Ok(_) => Err(ProbeError::NotFound(path.clone())),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(ProbeError::NotFound(path.clone()))
                }
                Err(e) => Err(ProbeError::Unreachable(e.to_string())),
            },
            AttachmentHandle::Remote { url } => {
                remote::head_content_length(client, url, probe_timeout).await
            }
        }
    }

    /// Playback duration of the attachment.
    ///
    /// Local: read from the media container metadata. Remote: never
    /// attempted — it would require downloading the full file — so this
    /// always fails with [`ProbeError::DurationUnavailable`].
    pub async fn probe_duration(&self) -> Result<EpisodeDuration, ProbeError> {
        match self {
            AttachmentHandle::Local { path, .. } => media::read_duration(path).await,
            AttachmentHandle::Remote { .. } => Err(ProbeError::DurationUnavailable),
        }
    }
}

/// Classifies attachment references against a site's URL and content root.
#[derive(Debug, Clone)]
pub struct AttachmentLocator {
    site_url: Url,
    content_root: PathBuf,
}

impl AttachmentLocator {
    /// `site_url` is the published root of the site; `content_root` is
    /// the directory article-relative attachment paths resolve under.
    pub fn new(mut site_url: Url, content_root: impl Into<PathBuf>) -> Self {
        // Url::join treats a path without a trailing slash as a file and
        // would replace its last segment instead of appending.
        if !site_url.path().ends_with('/') {
            site_url.set_path(&format!("{}/", site_url.path()));
        }
        Self {
            site_url,
            content_root: content_root.into(),
        }
    }

    /// Classify an attachment reference as Local or Remote.
    ///
    /// A well-formed absolute `http`/`https` URL is Remote. Anything
    /// else is treated as a filesystem path relative to the content
    /// root, with its publish URL derived by joining onto the site URL.
    pub fn classify(&self, attachment_ref: &str) -> Result<AttachmentHandle, ClassifyError> {
        let attachment_ref = attachment_ref.trim();
        if attachment_ref.is_empty() {
            return Err(ClassifyError::Empty);
        }

        match Url::parse(attachment_ref) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                Ok(AttachmentHandle::Remote { url })
            }
            Ok(url) => Err(ClassifyError::UnsupportedScheme(url.scheme().to_string())),
            Err(url::ParseError::RelativeUrlWithoutBase) => self.classify_local(attachment_ref),
            Err(e) => Err(ClassifyError::BadReference(e.to_string())),
        }
    }

    fn classify_local(&self, reference: &str) -> Result<AttachmentHandle, ClassifyError> {
        let relative = reference
            .trim_start_matches("./")
            .trim_start_matches('/');
        if relative.is_empty() {
            return Err(ClassifyError::Empty);
        }

        // References must stay inside the content root
        if Path::new(relative)
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(ClassifyError::BadReference(format!(
                "path escapes content root: {reference}"
            )));
        }

        let publish_url = self
            .site_url
            .join(relative)
            .map_err(|e| ClassifyError::BadReference(e.to_string()))?;

        Ok(AttachmentHandle::Local {
            path: self.content_root.join(relative),
            publish_url,
        })
    }
}
