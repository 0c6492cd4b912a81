//! Errors for request building and the transfer loop

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors from building, queuing and running requests.
#[derive(Error, Debug)]
pub enum Error {
    /// A buffer or list could not grow.
    #[error("out of memory: {0}")]
    Alloc(#[from] TryReserveError),

    /// The HTTP client could not be built, or a transfer failed.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A download target is neither an absolute URL nor a path.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The assembled URL bytes are not UTF-8.
    #[error("built URL is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A download was queued without a target.
    #[error("download request has no URL argument")]
    MissingArgument,

    /// The request was handed to a client before.
    #[error("request is already queued")]
    AlreadyQueued,

    /// The in-flight count is non-zero but no transfers are left to wait on.
    #[error("{0} requests counted in flight but no transfers are left")]
    LostTransfers(usize),

    /// A completion callback returned `ControlFlow::Break`.
    #[error("aborted by completion handler")]
    Aborted,
}

/// Result alias defaulting to [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
