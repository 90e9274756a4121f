use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackdropError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("unknown theme selector {0} (expected 0 = light or 1 = dark)")]
    UnknownTheme(u8),

    #[error("unknown theme name {0:?} (expected \"light\" or \"dark\")")]
    UnknownThemeName(String),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, BackdropError>;
