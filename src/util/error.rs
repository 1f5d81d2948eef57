//! Error types for the water-plane renderer.

use std::path::PathBuf;
use thiserror::Error;

use crate::render::ShaderStage;

/// Main error type for mesh generation and GPU resource creation.
#[derive(Error, Debug)]
pub enum Error {
    /// Grid parameters cannot produce a mesh
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Shader source file could not be read
    #[error("Cannot read shader source {path}: {source}")]
    ShaderIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A shader stage failed to compile
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    /// Program failed to link
    #[error("Program failed to link: {0}")]
    ProgramLink(String),

    /// GL context cannot run the tessellation pipeline
    #[error("Unsupported GL context: {0}")]
    UnsupportedContext(String),

    /// Image file could not be opened or decoded
    #[error("Cannot decode texture {path}: {message}")]
    TextureDecode { path: PathBuf, message: String },

    /// GL object creation failed
    #[error("GL error: {0}")]
    Gl(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid grid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }
}

/// Result type alias for water-plane operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::ShaderCompile {
            stage: ShaderStage::TessEval,
            log: "0:12: syntax error".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("tessellation evaluation"));
        assert!(msg.contains("syntax error"));

        let e = Error::invalid_grid("stepsize must be positive");
        assert!(e.to_string().contains("stepsize"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
