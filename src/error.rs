use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModlistError {
    #[error("Invalid list entry: {0}")]
    InvalidEntry(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModlistError>;
