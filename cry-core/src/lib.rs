//! # Cry Core
//!
//! Pure, stateless cry classifier shared by the cry-reason services:
//! - Centered analysis framing
//! - Frame-averaged acoustic features (zero-crossing rate, RMS, spectral centroid)
//! - Fixed-threshold decision rule mapping features to a cry reason

pub mod classifier;
pub mod error;
pub mod features;
pub mod framing;

pub use classifier::{classify, Classification, Reason};
pub use error::{ClassifyError, Result};
pub use features::{extract_features, FeatureSet};
pub use framing::FrameConfig;

/// Sample rate every clip is decoded to before classification (Hz)
pub const TARGET_SAMPLE_RATE: u32 = 22_050;
