//! Audio Test Fixture Generator
//!
//! Builds in-memory WAV uploads with simple, predictable content

use std::io::Cursor;

/// Content of a generated clip
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// Sine frequency in Hz; `None` writes silence
    pub frequency: Option<f64>,
    /// Peak amplitude in [0.0, 1.0]
    pub amplitude: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 1.0,
            sample_rate: 22_050,
            channels: 1,
            frequency: Some(440.0),
            amplitude: 0.3,
        }
    }
}

impl AudioConfig {
    pub fn silence(duration_seconds: f64) -> Self {
        Self {
            duration_seconds,
            frequency: None,
            ..Default::default()
        }
    }

    pub fn tone(frequency: f64, amplitude: f32) -> Self {
        Self {
            frequency: Some(frequency),
            amplitude,
            ..Default::default()
        }
    }
}

/// Generate a 16-bit PCM WAV file in memory
pub fn generate_wav_bytes(config: &AudioConfig) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let total_frames = (config.duration_seconds * config.sample_rate as f64) as usize;

        for i in 0..total_frames {
            let value = match config.frequency {
                Some(freq) => {
                    let t = i as f64 / config.sample_rate as f64;
                    config.amplitude as f64 * (2.0 * std::f64::consts::PI * freq * t).sin()
                }
                None => 0.0,
            };
            let sample = (value * i16::MAX as f64) as i16;

            for _ in 0..config.channels {
                writer.write_sample(sample).unwrap();
            }
        }

        writer.finalize().unwrap();
    }

    cursor.into_inner()
}

/// WAV header with a data chunk of zero frames
pub fn generate_empty_wav_bytes() -> Vec<u8> {
    generate_wav_bytes(&AudioConfig {
        duration_seconds: 0.0,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_simple_wav() {
        let bytes = generate_wav_bytes(&AudioConfig::default());
        // Header + 22050 frames * 2 bytes
        assert!(bytes.len() > 22_050 * 2);
        assert_eq!(&bytes[0..4], b"RIFF");
    }

    #[test]
    fn test_generate_empty_wav() {
        let bytes = generate_empty_wav_bytes();
        assert!(bytes.len() < 100, "header only, got {} bytes", bytes.len());
    }
}
