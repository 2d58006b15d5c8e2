//! Frame-averaged acoustic features
//!
//! All three features share one [`FrameConfig`] and are averaged over the
//! centered frames of the whole clip:
//! - Zero-crossing rate: sign changes within a frame / frame length
//! - RMS energy: `sqrt(mean(x²))` per frame
//! - Spectral centroid: magnitude-weighted mean bin frequency per frame (Hz)

use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, Result};
use crate::framing::{FrameConfig, PadMode};

/// Magnitudes at or below this are treated as exact zero (positive sign)
const ZERO_CROSSING_THRESHOLD: f32 = 1e-10;

/// The three summary statistics a classification is derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub zero_crossing_rate: f64,
    pub rms_energy: f64,
    /// Hz
    pub spectral_centroid: f64,
}

/// Compute all features over `samples` with the default framing.
///
/// # Errors
/// - [`ClassifyError::EmptySignal`] if `samples` is empty
/// - [`ClassifyError::InvalidSampleRate`] if `sample_rate` is zero
/// - [`ClassifyError::NonFiniteSample`] if any sample is NaN or infinite
/// - [`ClassifyError::Fft`] if the spectrum of a frame cannot be computed
pub fn extract_features(samples: &[f32], sample_rate: u32) -> Result<FeatureSet> {
    if samples.is_empty() {
        return Err(ClassifyError::EmptySignal);
    }
    if sample_rate == 0 {
        return Err(ClassifyError::InvalidSampleRate);
    }
    if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
        return Err(ClassifyError::NonFiniteSample(index));
    }

    let config = FrameConfig::default();
    let features = FeatureSet {
        zero_crossing_rate: zero_crossing_rate(samples, &config),
        rms_energy: rms_energy(samples, &config),
        spectral_centroid: spectral_centroid(samples, sample_rate, &config)?,
    };

    tracing::debug!(
        samples = samples.len(),
        frames = config.frame_count(samples.len()),
        zcr = features.zero_crossing_rate,
        rms = features.rms_energy,
        centroid_hz = features.spectral_centroid,
        "Extracted cry features"
    );

    Ok(features)
}

/// Mean per-frame zero-crossing rate (edge-padded frames)
pub fn zero_crossing_rate(samples: &[f32], config: &FrameConfig) -> f64 {
    config.mean_over_frames(samples, PadMode::Edge, |frame| {
        let crossings = frame
            .windows(2)
            .filter(|w| is_negative(w[0]) != is_negative(w[1]))
            .count();
        crossings as f64 / frame.len() as f64
    })
}

fn is_negative(sample: f32) -> bool {
    sample < 0.0 && sample.abs() > ZERO_CROSSING_THRESHOLD
}

/// Mean per-frame RMS amplitude (zero-padded frames)
pub fn rms_energy(samples: &[f32], config: &FrameConfig) -> f64 {
    config.mean_over_frames(samples, PadMode::Zero, |frame| {
        let sum_squares: f64 = frame.iter().map(|&s| (s as f64).powi(2)).sum();
        (sum_squares / frame.len() as f64).sqrt()
    })
}

/// Mean per-frame spectral centroid in Hz (zero-padded, Hann-windowed frames)
///
/// The FFT size equals the frame length; bin `k` sits at `k * sample_rate / n_fft`.
/// A frame with no spectral energy contributes 0 Hz.
///
/// # Errors
/// [`ClassifyError::Fft`] if a frame transform fails; no partial mean is returned.
pub fn spectral_centroid(samples: &[f32], sample_rate: u32, config: &FrameConfig) -> Result<f64> {
    let n_fft = config.frame_length;
    let mut planner = RealFftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n_fft);

    let window = hann_window(n_fft);
    let mut input = fft.make_input_vec();
    let mut spectrum = fft.make_output_vec();
    let mut scratch = fft.make_scratch_vec();
    let bin_hz = sample_rate as f64 / n_fft as f64;
    let mut failure = None;

    let mean = config.mean_over_frames(samples, PadMode::Zero, |frame| {
        if failure.is_some() {
            return 0.0;
        }
        for ((slot, &sample), &w) in input.iter_mut().zip(frame).zip(&window) {
            *slot = sample as f64 * w;
        }
        match frame_centroid(fft.as_ref(), &mut input, &mut spectrum, &mut scratch, bin_hz) {
            Ok(centroid) => centroid,
            Err(e) => {
                failure = Some(e);
                0.0
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(mean),
    }
}

/// Centroid of one windowed frame already loaded into `input`
fn frame_centroid(
    fft: &dyn RealToComplex<f64>,
    input: &mut [f64],
    spectrum: &mut [Complex<f64>],
    scratch: &mut [Complex<f64>],
    bin_hz: f64,
) -> Result<f64> {
    fft.process_with_scratch(input, spectrum, scratch)
        .map_err(|e| ClassifyError::Fft(e.to_string()))?;

    let mut weighted = 0.0f64;
    let mut total = 0.0f64;
    for (k, bin) in spectrum.iter().enumerate() {
        let magnitude = bin.norm();
        weighted += k as f64 * bin_hz * magnitude;
        total += magnitude;
    }

    if total <= f64::MIN_POSITIVE {
        Ok(0.0)
    } else {
        Ok(weighted / total)
    }
}

/// Periodic Hann window (suited to spectral analysis)
fn hann_window(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / size as f64).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TARGET_SAMPLE_RATE;

    fn sine(freq: f64, amplitude: f32, seconds: f64) -> Vec<f32> {
        let sr = TARGET_SAMPLE_RATE as f64;
        let n = (sr * seconds) as usize;
        (0..n)
            .map(|i| amplitude * (2.0 * std::f64::consts::PI * freq * i as f64 / sr).sin() as f32)
            .collect()
    }

    #[test]
    fn test_empty_signal_rejected() {
        assert_eq!(
            extract_features(&[], TARGET_SAMPLE_RATE),
            Err(ClassifyError::EmptySignal)
        );
    }

    #[test]
    fn test_empty_checked_before_sample_rate() {
        assert_eq!(extract_features(&[], 0), Err(ClassifyError::EmptySignal));
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        assert_eq!(
            extract_features(&[0.1, 0.2], 0),
            Err(ClassifyError::InvalidSampleRate)
        );
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        assert_eq!(
            extract_features(&[0.0, f32::NAN, 0.0], TARGET_SAMPLE_RATE),
            Err(ClassifyError::NonFiniteSample(1))
        );
    }

    #[test]
    fn test_silence_has_zero_features() {
        let samples = vec![0.0f32; 22_050];
        let features = extract_features(&samples, TARGET_SAMPLE_RATE).unwrap();
        assert_eq!(features.zero_crossing_rate, 0.0);
        assert_eq!(features.rms_energy, 0.0);
        assert_eq!(features.spectral_centroid, 0.0);
    }

    #[test]
    fn test_constant_signal_rms() {
        // Interior frames are fully covered; edge frames are half zero-padded
        let samples = vec![0.5f32; 22_050];
        let rms = rms_energy(&samples, &FrameConfig::default());
        assert!(rms > 0.45 && rms <= 0.5, "rms = {rms}");
    }

    #[test]
    fn test_alternating_signal_zcr_near_one() {
        let samples: Vec<f32> = (0..22_050)
            .map(|i| if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        let zcr = zero_crossing_rate(&samples, &FrameConfig::default());
        // Edge padding removes crossings from the boundary frames only
        assert!(zcr > 0.85 && zcr < 1.0, "zcr = {zcr}");
    }

    #[test]
    fn test_tiny_values_count_as_zero() {
        let samples: Vec<f32> = (0..4096)
            .map(|i| if i % 2 == 0 { 1e-12 } else { -1e-12 })
            .collect();
        let zcr = zero_crossing_rate(&samples, &FrameConfig::default());
        assert_eq!(zcr, 0.0);
    }

    #[test]
    fn test_sine_zcr_tracks_frequency() {
        // 1000 Hz -> 2000 crossings per second
        let samples = sine(1000.0, 0.5, 1.0);
        let zcr = zero_crossing_rate(&samples, &FrameConfig::default());
        let expected = 2000.0 / TARGET_SAMPLE_RATE as f64;
        assert!((zcr - expected).abs() < 0.02, "zcr = {zcr}, expected ~{expected}");
    }

    #[test]
    fn test_sine_centroid_tracks_frequency() {
        let samples = sine(1000.0, 0.5, 1.0);
        let centroid = spectral_centroid(&samples, TARGET_SAMPLE_RATE, &FrameConfig::default()).unwrap();
        assert!((centroid - 1000.0).abs() < 400.0, "centroid = {centroid}");

        let samples = sine(8000.0, 0.5, 1.0);
        let centroid = spectral_centroid(&samples, TARGET_SAMPLE_RATE, &FrameConfig::default()).unwrap();
        assert!(centroid > 6000.0, "centroid = {centroid}");
    }

    #[test]
    fn test_centroid_independent_of_amplitude() {
        let loud = sine(2000.0, 0.8, 0.5);
        let quiet = sine(2000.0, 0.01, 0.5);
        let config = FrameConfig::default();
        let a = spectral_centroid(&loud, TARGET_SAMPLE_RATE, &config).unwrap();
        let b = spectral_centroid(&quiet, TARGET_SAMPLE_RATE, &config).unwrap();
        assert!((a - b).abs() < 1.0, "{a} vs {b}");
    }

    #[test]
    fn test_short_clip_produces_finite_features() {
        let features = extract_features(&[0.3, -0.2, 0.1], TARGET_SAMPLE_RATE).unwrap();
        assert!(features.zero_crossing_rate.is_finite());
        assert!(features.rms_energy.is_finite());
        assert!(features.spectral_centroid.is_finite());
    }

    #[test]
    fn test_frame_transform_failure_is_reported() {
        let mut planner = RealFftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(16);
        let mut input = fft.make_input_vec();
        let mut scratch = fft.make_scratch_vec();
        // Spectrum buffer one bin short of what the plan expects
        let mut spectrum = vec![Complex::new(0.0, 0.0); fft.make_output_vec().len() - 1];

        let result = frame_centroid(fft.as_ref(), &mut input, &mut spectrum, &mut scratch, 1.0);
        assert!(matches!(result, Err(ClassifyError::Fft(_))));
    }

    #[test]
    fn test_frame_centroid_of_single_bin() {
        let mut planner = RealFftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(16);
        let mut input: Vec<f64> = (0..16)
            .map(|i| (2.0 * std::f64::consts::PI * 4.0 * i as f64 / 16.0).cos())
            .collect();
        let mut spectrum = fft.make_output_vec();
        let mut scratch = fft.make_scratch_vec();

        let centroid =
            frame_centroid(fft.as_ref(), &mut input, &mut spectrum, &mut scratch, 100.0).unwrap();
        assert!((centroid - 400.0).abs() < 1e-6, "centroid = {centroid}");
    }

    #[test]
    fn test_hann_window_is_periodic() {
        let w = hann_window(8);
        assert_eq!(w[0], 0.0);
        assert!((w[4] - 1.0).abs() < 1e-12);
        assert!((w[2] - w[6]).abs() < 1e-12);
    }
}
