use thiserror::Error;

use crate::core::media::FileKind;

/// Problems the form reports back to the user. All of them are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please select a video file!")]
    MissingVideo,
    #[error("Please select a subtitle file or enable metadata only mode!")]
    MissingSubtitle,
    #[error("{}", kind.alert_message())]
    InvalidExtension { kind: FileKind, name: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error ({path}): {message}")]
    Config { path: String, message: String },
    #[error(transparent)]
    Form(#[from] FormError),
}
