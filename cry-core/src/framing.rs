//! Centered analysis framing
//!
//! The signal is padded by half a frame on each side so frame `t` is
//! centered on sample `t * hop_length`. A clip of `len` samples yields
//! `1 + len / hop_length` frames with the default (even) frame length.

/// Analysis frame length in samples (also the FFT size)
pub const DEFAULT_FRAME_LENGTH: usize = 2048;

/// Distance between consecutive frame starts in samples
pub const DEFAULT_HOP_LENGTH: usize = 512;

/// How samples outside the clip are filled when padding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadMode {
    /// Fill with silence
    Zero,
    /// Repeat the nearest boundary sample
    Edge,
}

/// Frame length and hop shared by every feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    pub frame_length: usize,
    pub hop_length: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_length: DEFAULT_FRAME_LENGTH,
            hop_length: DEFAULT_HOP_LENGTH,
        }
    }
}

impl FrameConfig {
    /// Returns `None` if either length is zero.
    pub fn new(frame_length: usize, hop_length: usize) -> Option<Self> {
        if frame_length == 0 || hop_length == 0 {
            return None;
        }
        Some(Self {
            frame_length,
            hop_length,
        })
    }

    /// Padding applied on each side of the clip
    pub fn pad(&self) -> usize {
        self.frame_length / 2
    }

    /// Number of centered frames covering a clip of `len` samples
    pub fn frame_count(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let padded = len + 2 * self.pad();
        match padded.checked_sub(self.frame_length) {
            Some(span) => 1 + span / self.hop_length,
            None => 0,
        }
    }

    /// Call `f` with every centered frame of `samples`, in order.
    ///
    /// A single buffer is reused across frames, so `f` must not hold on to
    /// the slice.
    pub fn for_each_frame<F>(&self, samples: &[f32], pad_mode: PadMode, mut f: F)
    where
        F: FnMut(&[f32]),
    {
        let count = self.frame_count(samples.len());
        if count == 0 {
            return;
        }

        let pad = self.pad() as isize;
        let len = samples.len() as isize;
        let first = samples[0];
        let last = samples[samples.len() - 1];
        let mut frame = vec![0.0f32; self.frame_length];

        for t in 0..count {
            let start = (t * self.hop_length) as isize - pad;
            for (offset, slot) in frame.iter_mut().enumerate() {
                let i = start + offset as isize;
                *slot = if i < 0 {
                    match pad_mode {
                        PadMode::Zero => 0.0,
                        PadMode::Edge => first,
                    }
                } else if i >= len {
                    match pad_mode {
                        PadMode::Zero => 0.0,
                        PadMode::Edge => last,
                    }
                } else {
                    samples[i as usize]
                };
            }
            f(&frame);
        }
    }

    /// Mean of `per_frame` over all centered frames; 0.0 for an empty clip
    pub fn mean_over_frames<F>(&self, samples: &[f32], pad_mode: PadMode, mut per_frame: F) -> f64
    where
        F: FnMut(&[f32]) -> f64,
    {
        let mut sum = 0.0f64;
        let mut count = 0usize;
        self.for_each_frame(samples, pad_mode, |frame| {
            sum += per_frame(frame);
            count += 1;
        });

        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }
}
