//! Error types for asset loading and pipeline assembly.

use thiserror::Error;

/// Errors that can occur while fetching or decoding viewer assets.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode {what}: {detail}")]
    Decode { what: &'static str, detail: String },
    #[error("model bounding box has no volume; cannot derive a finite fit scale")]
    DegenerateBounds,
    #[error("loader channel closed before all assets arrived")]
    ChannelClosed,
}

impl LoadError {
    /// Shorthand for a decode failure with context.
    pub fn decode(what: &'static str, detail: impl std::fmt::Display) -> Self {
        LoadError::Decode {
            what,
            detail: detail.to_string(),
        }
    }
}

/// Errors raised while assembling the effect chain.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PipelineError {
    #[error("pass '{0}' consumes the geometry buffers but no enabled pass produces them")]
    MissingProducer(&'static str),
}
