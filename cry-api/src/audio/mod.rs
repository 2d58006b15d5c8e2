//! Audio ingest for uploaded clips
//!
//! Turns arbitrary uploaded bytes into the canonical clip the classifier
//! expects: mono `f32` samples at [`cry_core::TARGET_SAMPLE_RATE`].

pub mod decoder;
pub mod resampler;

pub use decoder::{decode_audio_bytes, DecodedAudio};
pub use resampler::resample_mono;

use std::path::Path;
use thiserror::Error;

/// Failures while turning uploaded bytes into samples
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Container/format not recognized
    #[error("unrecognized audio format ({0})")]
    Probe(String),

    /// Container holds no decodable audio track
    #[error("no audio track found")]
    NoAudioTrack,

    /// Neither the track nor the decoded data declares a sample rate
    #[error("sample rate unknown")]
    UnknownSampleRate,

    /// Codec not supported by the decoder registry
    #[error("unsupported codec ({0})")]
    UnsupportedCodec(String),

    /// Container read failure other than end of stream
    #[error("failed to read packet ({0})")]
    Packet(String),

    /// Unrecoverable codec failure
    #[error("failed to decode audio ({0})")]
    Decode(String),

    /// Sample-rate conversion failure
    #[error("failed to resample audio ({0})")]
    Resample(String),
}

/// Decode `bytes` and resample to `target_rate`.
///
/// `filename` only contributes its extension as a format hint; the
/// container is always probed from the bytes themselves.
pub fn load_clip(bytes: Vec<u8>, filename: &str, target_rate: u32) -> Result<DecodedAudio, DecodeError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str());

    let decoded = decode_audio_bytes(bytes, extension)?;
    if decoded.sample_rate == target_rate {
        return Ok(decoded);
    }

    tracing::debug!(
        from_hz = decoded.sample_rate,
        to_hz = target_rate,
        "Resampling uploaded clip"
    );

    let samples = resample_mono(decoded.samples, decoded.sample_rate, target_rate)?;
    let duration_seconds = samples.len() as f64 / target_rate as f64;

    Ok(DecodedAudio {
        samples,
        sample_rate: target_rate,
        channels: decoded.channels,
        duration_seconds,
    })
}
