use std::{path::PathBuf, process::ExitStatus};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    //
    // Invalid user input
    //
    #[error("Invalid image reference: {0}")]
    InvalidReference(String),
    #[error("Not an archive filename produced by export: {0}")]
    InvalidArchiveName(String),
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
    #[error("Not a file, or not exist: {0}")]
    NotAFile(PathBuf),
    #[error("Not a directory, or not exist: {0}")]
    NotADirectory(PathBuf),

    //
    // Invalid configuration
    //
    #[error(transparent)]
    InvalidJson(#[from] serde_json::error::Error),
    #[error("No images listed in configuration: {0}")]
    EmptyImageList(PathBuf),

    //
    // Error from the container runtime
    //
    #[error("Container runtime is unreachable: {0}")]
    RuntimeUnreachable(String),
    #[error("`{command}` failed: {status}")]
    CommandFailed { command: String, status: ExitStatus },

    //
    // System error
    //
    #[error(transparent)]
    UnknownIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
