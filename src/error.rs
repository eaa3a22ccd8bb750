//! Errors raised while building a wave
//!
//! Only construction can fail. Once a `Wave` exists, every tick succeeds.

use crate::sim::WavePhase;

/// Wave construction and control errors
#[derive(thiserror::Error, Debug)]
pub enum WaveError {
    /// Malformed JSON, a missing field or an unknown size tag
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Descriptor data that decoded but cannot describe a playable wave
    #[error("Invalid wave descriptor: {field} {reason}")]
    InvalidDescriptor { field: String, reason: String },

    /// Tuning constant outside its usable range
    #[error("Invalid tuning: {field} {reason}")]
    InvalidTuning { field: &'static str, reason: String },

    /// Respawn requested while the wave is not waiting for a new ship
    #[error("Cannot respawn ship while wave is {0:?}")]
    RespawnUnavailable(WavePhase),
}

impl WaveError {
    pub(crate) fn descriptor(field: impl Into<String>, reason: impl Into<String>) -> Self {
        WaveError::InvalidDescriptor {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn tuning(field: &'static str, reason: impl Into<String>) -> Self {
        WaveError::InvalidTuning {
            field,
            reason: reason.into(),
        }
    }
}
