//! Crate-wide error taxonomy. Every fallible operation in the renderer
//! returns `Result<_, RtError>`; there is no panic/unwrap path outside of
//! tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RtError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("resource error: {0}")]
    Resource(String),
}

impl RtError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RtError::Io { path: path.into(), source }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        RtError::Parse { line, message: message.into() }
    }

    pub fn geometry(message: impl Into<String>) -> Self {
        RtError::Geometry(message.into())
    }

    pub fn resource(message: impl Into<String>) -> Self {
        RtError::Resource(message.into())
    }
}

pub type Result<T> = std::result::Result<T, RtError>;
