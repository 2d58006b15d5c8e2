//! Fixed-threshold cry classifier
//!
//! Rules are evaluated in order and the first match wins. They overlap, so
//! the order itself is the tie-break:
//! 1. `spectral_centroid > 3500 Hz` → belly pain
//! 2. `rms_energy > 0.05` → hunger
//! 3. `zero_crossing_rate > 0.1` → burping
//! 4. otherwise → discomfort
//!
//! The thresholds are fixed heuristic constants.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::features::{extract_features, FeatureSet};

/// Spectral centroid above which a cry is labelled belly pain (Hz)
pub const BELLY_PAIN_MIN_CENTROID_HZ: f64 = 3500.0;

/// RMS energy above which a cry is labelled hunger
pub const HUNGER_MIN_RMS: f64 = 0.05;

/// Zero-crossing rate above which a cry is labelled burping
pub const BURPING_MIN_ZCR: f64 = 0.1;

/// Plausible reason an infant is crying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    BellyPain,
    Hunger,
    Burping,
    Discomfort,
}

impl Reason {
    /// Every label, in rule order
    pub const ALL: [Reason; 4] = [
        Reason::BellyPain,
        Reason::Hunger,
        Reason::Burping,
        Reason::Discomfort,
    ];

    /// Wire label (snake_case)
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::BellyPain => "belly_pain",
            Reason::Hunger => "hunger",
            Reason::Burping => "burping",
            Reason::Discomfort => "discomfort",
        }
    }

    /// Apply the ordered decision rule. Comparisons are strict.
    pub fn from_features(features: &FeatureSet) -> Self {
        if features.spectral_centroid > BELLY_PAIN_MIN_CENTROID_HZ {
            Reason::BellyPain
        } else if features.rms_energy > HUNGER_MIN_RMS {
            Reason::Hunger
        } else if features.zero_crossing_rate > BURPING_MIN_ZCR {
            Reason::Burping
        } else {
            Reason::Discomfort
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label plus the features it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub reason: Reason,
    pub features: FeatureSet,
}

/// Classify a mono clip.
///
/// Pure function: no state is read or retained, so concurrent calls need
/// no coordination. Input errors are returned before any feature is
/// computed and no partial result is produced.
pub fn classify(samples: &[f32], sample_rate: u32) -> Result<Classification> {
    let features = extract_features(samples, sample_rate)?;
    let reason = Reason::from_features(&features);

    tracing::debug!(reason = %reason, "Cry classified");

    Ok(Classification { reason, features })
}
