//! Error handling for glasscut.
//!
//! The engine has one recognized runtime failure mode: audio output being
//! unavailable. Playback degrades to silence in that case and the error never
//! reaches the session loop. Everything else here covers configuration and
//! file I/O surfaces.

use thiserror::Error;

/// Result type alias for glasscut operations
pub type Result<T> = std::result::Result<T, GlasscutError>;

/// Main error type for glasscut operations
#[derive(Error, Debug)]
pub enum GlasscutError {
    // Audio output errors
    #[error("No audio output device available")]
    NoOutputDevice,

    #[error("Audio stream error: {reason}")]
    AudioStream { reason: String },

    #[error("Unsupported output sample format: {format}")]
    UnsupportedSampleFormat { format: String },

    // Configuration errors
    #[error("Invalid parameter: {param} = {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    // Render errors
    #[error("WAV write error: {0}")]
    Wav(#[from] hound::Error),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GlasscutError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            GlasscutError::NoOutputDevice => "NO_OUTPUT_DEVICE",
            GlasscutError::AudioStream { .. } => "AUDIO_STREAM",
            GlasscutError::UnsupportedSampleFormat { .. } => "UNSUPPORTED_SAMPLE_FORMAT",
            GlasscutError::InvalidParameter { .. } => "INVALID_PARAMETER",
            GlasscutError::Wav(_) => "WAV_ERROR",
            GlasscutError::Io(_) => "IO_ERROR",
            GlasscutError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Audio output errors are recoverable: the session keeps running and
    /// simply produces no sound.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GlasscutError::NoOutputDevice
                | GlasscutError::AudioStream { .. }
                | GlasscutError::UnsupportedSampleFormat { .. }
        )
    }
}
