use thiserror::Error;

/// Failures during file ingestion. Caught at the batch-loop boundary,
/// logged, and surfaced as a transient status message; never fatal to the
/// session.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The container is not a standard raster format (e.g. an unsupported
    /// or corrupt HEIC source). Diagnosable, so it gets its own message.
    #[error("unsupported or corrupt source container: {name}")]
    Transcode { name: String },

    #[error("failed to decode {name}: {reason}")]
    Decode { name: String, reason: String },

    #[error("face detection failed on {name}: {reason}")]
    Detection { name: String, reason: String },
}

impl ImportError {
    /// User-facing status text. Decode and detection failures share one
    /// generic message; transcode failures name the real cause.
    pub fn user_message(&self) -> String {
        match self {
            ImportError::Transcode { name } => {
                format!("{name}: unsupported image container")
            }
            ImportError::Decode { name, .. } | ImportError::Detection { name, .. } => {
                format!("{name}: failed to load image")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
