//! Per-field metadata resolution: explicit value, then probe, then omit.
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::duration::EpisodeDuration;
use crate::probe::AttachmentHandle;

/// Which enclosure field a skip or validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Length,
    Duration,
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataField::Length => f.write_str("length"),
            MetadataField::Duration => f.write_str("duration"),
        }
    }
}

/// An explicitly supplied metadata value that failed validation.
///
/// Unlike probe failures this is an authoring error, so it excludes the
/// episode from the feed rather than degrading to omission.
#[derive(Debug, Error)]
#[error("invalid {field} value: '{value}'")]
pub struct InvalidMetadataValue {
    pub field: MetadataField,
    pub value: String,
}

/// A field that could not be determined and was omitted from the entry.
/// Informational only; never a build failure.
#[derive(Debug, Clone)]
pub struct FieldSkip {
    pub field: MetadataField,
    pub reason: String,
}

/// The final (length, duration) pair for an episode.
///
/// `None` means the field is omitted from the emitted entry entirely —
/// never rendered as zero or an empty string.
#[derive(Debug, Clone, Default)]
pub struct ResolvedMetadata {
    pub length: Option<u64>,
    pub duration: Option<EpisodeDuration>,
}

/// Resolves enclosure metadata for one episode at a time.
///
/// Each field follows the same priority chain, independently of the
/// other:
///
/// 1. An explicitly supplied value is used verbatim after syntax
///    validation; no probe I/O happens for that field.
/// 2. Otherwise the field is probed via the [`AttachmentHandle`].
/// 3. If the probe fails, the field is omitted and the failure recorded
///    as an informational skip.
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    client: reqwest::Client,
    probe_timeout: Duration,
}

impl MetadataResolver {
    pub fn new(client: reqwest::Client, probe_timeout: Duration) -> Self {
        Self {
            client,
            probe_timeout,
        }
    }

    /// Resolve both enclosure fields for one episode.
    ///
    /// Returns the resolved pair plus any informational skips. The only
    /// error is [`InvalidMetadataValue`] — a malformed explicit value —
    /// which the caller turns into a per-episode exclusion.
    pub async fn resolve(
        &self,
        handle: &AttachmentHandle,
        explicit_length: Option<&str>,
        explicit_duration: Option<&str>,
    ) -> Result<(ResolvedMetadata, Vec<FieldSkip>), InvalidMetadataValue> {
        let mut skips = Vec::new();

        // Validate explicit values before any I/O so a malformed value
        // never costs a network round-trip
        let explicit_length = explicit_length
            .map(|raw| parse_length(raw))
            .transpose()?;
        let explicit_duration = explicit_duration
            .map(|raw| parse_duration(raw))
            .transpose()?;

        let length = match explicit_length {
            Some(len) => Some(len),
            None => match handle.probe_length(&self.client, self.probe_timeout).await {
                Ok(len) => Some(len),
                Err(e) => {
                    tracing::debug!(url = %handle.publish_url(), error = %e, "Length probe failed, omitting field");
                    skips.push(FieldSkip {
                        field: MetadataField::Length,
                        reason: e.to_string(),
                    });
                    None
                }
            },
        };

        let duration = match explicit_duration {
            Some(d) => Some(d),
            None => match handle.probe_duration().await {
                Ok(d) => Some(d),
                Err(e) => {
                    tracing::debug!(url = %handle.publish_url(), error = %e, "Duration probe failed, omitting field");
                    skips.push(FieldSkip {
                        field: MetadataField::Duration,
                        reason: e.to_string(),
                    });
                    None
                }
            },
        };

        Ok((ResolvedMetadata { length, duration }, skips))
    }
}

fn parse_length(raw: &str) -> Result<u64, InvalidMetadataValue> {
    raw.trim().parse::<u64>().map_err(|_| InvalidMetadataValue {
        field: MetadataField::Length,
        value: raw.to_string(),
    })
}

fn parse_duration(raw: &str) -> Result<EpisodeDuration, InvalidMetadataValue> {
    raw.parse::<EpisodeDuration>()
        .map_err(|_| InvalidMetadataValue {
            field: MetadataField::Duration,
            value: raw.to_string(),
        })
}
