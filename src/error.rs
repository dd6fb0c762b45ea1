use std::path::PathBuf;

use crate::io::AudioError;

/// Crate-level error type for drone-relative interval analysis.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The audio path does not resolve to a file.
    #[error("audio source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// The file exists but could not be turned into samples.
    #[error("could not decode audio: {0}")]
    Decode(AudioError),

    /// No voiced frame was found inside the drone reference window.
    #[error("drone reference undetermined: no voiced frames in the first {window_frames} frames")]
    DroneUndetermined { window_frames: usize },

    /// A frequency passed to a conversion was non-positive or non-finite.
    #[error("invalid frequency `{name}`: {value} Hz (must be positive and finite)")]
    InvalidFrequency { name: &'static str, value: f32 },

    /// Invalid parameter value.
    #[error("invalid parameter `{name}`: got {value}, {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A required dimension is zero or invalid.
    #[error("invalid size for `{name}`: {value} ({reason})")]
    InvalidSize {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },

    /// Frequency range is invalid.
    #[error("invalid frequency range: fmin={fmin}, fmax={fmax} ({reason})")]
    InvalidFrequencyRange {
        fmin: f32,
        fmax: f32,
        reason: String,
    },

    /// Parallel sequences have different lengths.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// Audio data is empty when a non-empty signal was required.
    #[error("audio data is empty")]
    EmptyAudio,

    /// Audio data contains non-finite values (NaN or Inf).
    #[error("audio data contains non-finite values")]
    NonFiniteAudio,
}

impl Error {
    /// True when the audio itself could not be obtained (missing or
    /// undecodable file). Retrying with a different file may succeed.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Error::SourceNotFound { .. } | Error::Decode(_))
    }
}

impl From<AudioError> for Error {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::NotFound { path } => Error::SourceNotFound { path },
            other => Error::Decode(other),
        }
    }
}

/// Convenience Result type for drone-interval operations.
pub type Result<T> = std::result::Result<T, Error>;
