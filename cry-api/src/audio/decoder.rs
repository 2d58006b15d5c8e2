//! In-memory audio decoding
//!
//! Uses symphonia for format-agnostic decoding (WAV, MP3, FLAC, AAC, OGG, ...)
//! of uploaded bytes into mono f32 PCM.

use std::io::Cursor;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use tracing::{debug, warn};

use super::DecodeError;

/// Decoded audio result
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono audio samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count of the source before downmixing
    pub channels: usize,
    /// Duration in seconds
    pub duration_seconds: f64,
}

/// Decode an in-memory audio file to mono f32 PCM samples
///
/// **Algorithm:**
/// 1. Probe the container from the bytes (extension used as a hint only)
/// 2. Select the first track with a real codec
/// 3. Decode all packets, skipping packets with recoverable decode errors
/// 4. Average all channels to mono
///
/// An empty `samples` vector is a valid result (e.g. a header-only WAV);
/// callers decide whether that is acceptable.
pub fn decode_audio_bytes(bytes: Vec<u8>, extension: Option<&str>) -> Result<DecodedAudio, DecodeError> {
    debug!(bytes = bytes.len(), extension = ?extension, "Decoding uploaded audio");

    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DecodeError::Probe(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::UnsupportedCodec(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            // Chained streams are not supported; keep what was decoded so far
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(DecodeError::Packet(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate.get_or_insert(spec.rate);
                channels = spec.channels.count();
                downmix_into(&decoded, &mut samples);
            }
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping undecodable packet: {}", e);
                skipped_packets += 1;
            }
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(DecodeError::Decode(e.to_string())),
        }
    }

    let sample_rate = sample_rate.ok_or(DecodeError::UnknownSampleRate)?;
    if sample_rate == 0 {
        return Err(DecodeError::UnknownSampleRate);
    }
    let duration_seconds = samples.len() as f64 / sample_rate as f64;

    debug!(
        total_samples = samples.len(),
        sample_rate,
        channels,
        skipped_packets,
        duration_seconds = format!("{:.2}", duration_seconds),
        "Audio decoding complete"
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
        duration_seconds,
    })
}

/// Append the channel average of every frame in `decoded` to `out`
fn downmix_into(decoded: &AudioBufferRef<'_>, out: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::U8(buf) => downmix(buf, out),
        AudioBufferRef::U16(buf) => downmix(buf, out),
        AudioBufferRef::U24(buf) => downmix(buf, out),
        AudioBufferRef::U32(buf) => downmix(buf, out),
        AudioBufferRef::S8(buf) => downmix(buf, out),
        AudioBufferRef::S16(buf) => downmix(buf, out),
        AudioBufferRef::S24(buf) => downmix(buf, out),
        AudioBufferRef::S32(buf) => downmix(buf, out),
        AudioBufferRef::F32(buf) => downmix(buf, out),
        AudioBufferRef::F64(buf) => downmix(buf, out),
    }
}

fn downmix<S>(buf: &AudioBuffer<S>, out: &mut Vec<f32>)
where
    S: Sample,
    f32: FromSample<S>,
{
    let num_channels = buf.spec().channels.count();
    if num_channels == 0 {
        return;
    }

    let num_frames = buf.frames();
    out.reserve(num_frames);

    for frame_idx in 0..num_frames {
        let sum: f32 = (0..num_channels)
            .map(|ch| f32::from_sample(buf.chan(ch)[frame_idx]))
            .sum();
        out.push(sum / num_channels as f32);
    }
}
