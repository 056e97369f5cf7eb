use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when parsing a duration value from article metadata.
#[derive(Debug, Error)]
pub enum DurationParseError {
    /// The value was empty or whitespace-only.
    #[error("duration value is empty")]
    Empty,
    /// A segment was not a valid number.
    #[error("invalid duration segment: {0}")]
    InvalidSegment(String),
    /// A minutes/seconds segment in a colon-separated form was 60 or greater.
    #[error("duration segment out of range: {0}")]
    SegmentOutOfRange(u64),
    /// More than three colon-separated segments.
    #[error("too many segments in duration value")]
    TooManySegments,
}

/// Playback duration of an episode attachment, stored as whole seconds.
///
/// Accepts the three syntaxes podcast authors actually write in front
/// matter: `HH:MM:SS`, `MM:SS`, and bare seconds (`754`). Always renders
/// as `HH:MM:SS`, which is what iTunes-style `<itunes:duration>` elements
/// expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EpisodeDuration {
    secs: u64,
}

impl EpisodeDuration {
    pub fn from_secs(secs: u64) -> Self {
        Self { secs }
    }

    pub fn as_secs(&self) -> u64 {
        self.secs
    }
}

impl From<Duration> for EpisodeDuration {
    /// Whole seconds, rounded down. Sub-second precision is meaningless
    /// in a feed duration element.
    fn from(d: Duration) -> Self {
        Self { secs: d.as_secs() }
    }
}

impl FromStr for EpisodeDuration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DurationParseError::Empty);
        }

        let segments: Vec<&str> = s.split(':').collect();
        if segments.len() > 3 {
            return Err(DurationParseError::TooManySegments);
        }

        let parsed: Vec<u64> = segments
            .iter()
            .map(|seg| {
                seg.parse::<u64>()
                    .map_err(|_| DurationParseError::InvalidSegment(seg.to_string()))
            })
            .collect::<Result<_, _>>()?;

        let secs = match parsed.as_slice() {
            [secs] => *secs,
            [mins, secs] => {
                for &seg in &[*mins, *secs] {
                    if seg >= 60 {
                        return Err(DurationParseError::SegmentOutOfRange(seg));
                    }
                }
                mins * 60 + secs
            }
            [hours, mins, secs] => {
                for &seg in &[*mins, *secs] {
                    if seg >= 60 {
                        return Err(DurationParseError::SegmentOutOfRange(seg));
                    }
                }
                // An hour count near u64::MAX would wrap the total
                hours
                    .checked_mul(3600)
                    .and_then(|h| h.checked_add(mins * 60 + secs))
                    .ok_or(DurationParseError::SegmentOutOfRange(*hours))?
            }
            _ => unreachable!("segment count checked above"),
        };

        Ok(Self { secs })
    }
}

impl fmt::Display for EpisodeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.secs / 3600;
        let mins = (self.secs % 3600) / 60;
        let secs = self.secs % 60;
        write!(f, "{:02}:{:02}:{:02}", hours, mins, secs)
    }
}

impl TryFrom<String> for EpisodeDuration {
    type Error = DurationParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EpisodeDuration> for String {
    fn from(d: EpisodeDuration) -> Self {
        d.to_string()
    }
}
