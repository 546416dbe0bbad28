/// Error type shared by the loader, renderer, and encoder
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlybyError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlybyError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlybyError>;
