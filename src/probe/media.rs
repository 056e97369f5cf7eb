use lofty::file::AudioFile;
use lofty::probe::Probe;
use std::path::Path;

use super::ProbeError;
use crate::duration::EpisodeDuration;

/// Reads the playback duration from a local media file's container
/// metadata. Container parsing is synchronous, so it runs on the
/// blocking pool.
pub(crate) async fn read_duration(path: &Path) -> Result<EpisodeDuration, ProbeError> {
    let path = path.to_owned();
    tokio::task::spawn_blocking(move || read_duration_blocking(&path))
        .await
        // A join failure is ours, not a property of the media file
        .map_err(|e| ProbeError::Unreachable(format!("duration probe interrupted: {e}")))?
}

fn read_duration_blocking(path: &Path) -> Result<EpisodeDuration, ProbeError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(ProbeError::NotFound(path.to_path_buf())),
    }

    let tagged = Probe::open(path)
        .map_err(|e| ProbeError::UnsupportedFormat(e.to_string()))?
        .guess_file_type()
        .map_err(|e| ProbeError::UnsupportedFormat(e.to_string()))?
        .read()
        .map_err(|e| ProbeError::UnsupportedFormat(e.to_string()))?;

    let duration = tagged.properties().duration();
    if duration.is_zero() {
        // A container that parses but reports no length carries no usable
        // duration tag
        return Err(ProbeError::DurationUnavailable);
    }

    Ok(EpisodeDuration::from(duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal PCM WAV of the given playing time: 8 kHz, 16-bit, mono.
    pub(crate) fn write_wav(path: &Path, secs: u32) {
        let sample_rate: u32 = 8000;
        let channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let block_align = channels * bits_per_sample / 8;
        let byte_rate = sample_rate * block_align as u32;
        let data_len = byte_rate * secs;

        let mut buf = Vec::with_capacity(44 + data_len as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_len).to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&channels.to_le_bytes());
        buf.extend_from_slice(&sample_rate.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_len.to_le_bytes());
        buf.resize(buf.len() + data_len as usize, 0);
        std::fs::write(path, buf).unwrap();
    }

    #[tokio::test]
    async fn test_wav_duration() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("episode.wav");
        write_wav(&file, 3);

        let duration = read_duration(&file).await.unwrap();
        assert_eq!(duration.as_secs(), 3);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_duration(&dir.path().join("missing.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_garbage_bytes_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.mp3");
        std::fs::write(&file, b"this is not a media container").unwrap();

        let err = read_duration(&file).await.unwrap_err();
        assert!(matches!(err, ProbeError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_duration(dir.path()).await.unwrap_err();
        assert!(matches!(err, ProbeError::NotFound(_)));
    }
}
