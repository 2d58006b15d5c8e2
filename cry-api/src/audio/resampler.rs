//! Mono sample-rate conversion
//!
//! Band-limited sinc interpolation via rubato `SincFixedIn`. The clip is fed
//! as one chunk, the filter is flushed with silence, and the filter delay is
//! trimmed so the output holds exactly `ceil(len * target / source)` frames
//! aligned with the input.

use rubato::{Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction};
use tracing::debug;

use super::DecodeError;

/// Smallest chunk handed to the resampler; short clips are zero-padded up to it
const MIN_CHUNK_FRAMES: usize = 1024;

/// Resample mono PCM from `source_rate` to `target_rate`
///
/// Returns the input untouched when the rates match or the input is empty.
pub fn resample_mono(samples: Vec<f32>, source_rate: u32, target_rate: u32) -> Result<Vec<f32>, DecodeError> {
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples);
    }
    if source_rate == 0 || target_rate == 0 {
        return Err(DecodeError::Resample(format!(
            "invalid rates {} Hz -> {} Hz",
            source_rate, target_rate
        )));
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = target_rate as f64 / source_rate as f64;
    let num_frames = samples.len();
    let expected = resampled_len(num_frames, source_rate, target_rate);
    let chunk_size = num_frames.max(MIN_CHUNK_FRAMES);

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| DecodeError::Resample(e.to_string()))?;
    let delay = resampler.output_delay();

    let mut output = Vec::with_capacity(delay + expected);
    let input = [samples];
    let first = if num_frames == chunk_size {
        resampler.process(&input[..], None)
    } else {
        resampler.process_partial(Some(&input[..]), None)
    };
    append_channel(&mut output, first)?;

    // Drain the filter until the delayed tail of the clip has come out
    while output.len() < delay + expected {
        let before = output.len();
        append_channel(&mut output, resampler.process_partial(None::<&[Vec<f32>]>, None))?;
        if output.len() == before {
            return Err(DecodeError::Resample(
                "resampler produced no output while flushing".to_string(),
            ));
        }
    }

    output.drain(..delay);
    output.truncate(expected);

    debug!(
        "Resampled {} frames ({} Hz) → {} frames ({} Hz)",
        num_frames,
        source_rate,
        output.len(),
        target_rate
    );

    Ok(output)
}

/// Output length for `len` input frames: `ceil(len * target_rate / source_rate)`
pub fn resampled_len(len: usize, source_rate: u32, target_rate: u32) -> usize {
    let numerator = len as u128 * target_rate as u128;
    numerator.div_ceil(source_rate as u128) as usize
}

fn append_channel(
    output: &mut Vec<f32>,
    result: Result<Vec<Vec<f32>>, rubato::ResampleError>,
) -> Result<(), DecodeError> {
    let channels = result.map_err(|e| DecodeError::Resample(e.to_string()))?;
    if let Some(channel) = channels.into_iter().next() {
        output.extend(channel);
    }
    Ok(())
}
