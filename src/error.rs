use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatdeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("GUI error: {0}")]
    GuiError(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Delete was abandoned before it reported a result")]
    DeleteAbandoned,
}

pub type Result<T> = std::result::Result<T, ChatdeckError>;
