use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal engine errors. These abort a run before any rule is evaluated;
/// conformance findings are reported as [`crate::Diagnostic`]s instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("sdp: document contains no lines")]
    EmptyDocument,
    #[error("utf-8 error: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Io(#[source] IoError),
}

#[derive(Debug, Error)]
#[error("io error: {0}")]
pub struct IoError(#[from] pub io::Error);

// Workaround for wanting PartialEq for io::Error.
impl PartialEq for IoError {
    fn eq(&self, other: &Self) -> bool {
        self.0.kind() == other.0.kind()
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(IoError(e))
    }
}
