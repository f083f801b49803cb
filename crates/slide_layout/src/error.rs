use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayoutError>;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(
        "Unsupported image distribution: {horizontal} horizontal, {vertical} vertical"
    )]
    UnsupportedDistribution { horizontal: usize, vertical: usize },

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create file {path}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
