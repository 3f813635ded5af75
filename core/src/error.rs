//! Error types for request building and dispatch.
//!
//! # Design
//! The first failure during assembly aborts the whole build, so every
//! variant describes exactly one step that went wrong. File failures carry
//! the offending path. `FileNotFound` is split out from `Io` because a
//! missing upload is the failure callers most often want to match on.

use std::io;
use std::path::PathBuf;

/// Errors returned by `build_request`, `send` and related helpers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A file referenced by a multipart build does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A referenced file could not be opened or copied into the body.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a form field or the closing boundary failed.
    #[error("failed to write multipart body: {0}")]
    Body(#[source] io::Error),

    /// The JSON payload could not be serialized.
    #[error("serialization failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The target URL could not be parsed.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A verb string did not name a supported HTTP method.
    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),

    /// The built request cannot be expressed on the wire, e.g. a header
    /// name containing spaces.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The transport failed to execute the request.
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),
}

impl ApiError {
    /// Classify a failure to open `path`.
    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            ApiError::FileNotFound { path, source }
        } else {
            ApiError::Io { path, source }
        }
    }
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_maps_not_found() {
        let err = ApiError::open("missing.png", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, ApiError::FileNotFound { ref path, .. } if path.ends_with("missing.png")));
        assert_eq!(err.to_string(), "file not found: missing.png");
    }

    #[test]
    fn open_maps_other_kinds_to_io() {
        let err = ApiError::open("locked.png", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, ApiError::Io { .. }));
    }
}
