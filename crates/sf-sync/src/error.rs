//! Error types for sf-sync.

use std::path::Path;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// A filesystem failure on `path`.
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        Self::with_source(
            ErrorKind::Io(format!("{}: {}", path.display(), err)),
            err,
        )
    }

    /// A zip archive failure on `path`.
    pub fn archive(path: &Path, err: zip::result::ZipError) -> Self {
        Self::with_source(
            ErrorKind::Archive(format!("{}: {}", path.display(), err)),
            err,
        )
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage(message.into()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("{0}")]
    Usage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("{0}")]
    Transport(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Archive error: {0}")]
    Archive(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl From<busbar_sf_metadata::Error> for Error {
    fn from(err: busbar_sf_metadata::Error) -> Self {
        Error {
            kind: ErrorKind::Transport(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Io(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error {
            kind: ErrorKind::Archive(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        let message = match err.path() {
            Some(path) => format!("{}: {}", path.display(), err),
            None => err.to_string(),
        };
        Error {
            kind: ErrorKind::Io(message),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_message_is_verbatim() {
        let err = Error::usage("must specify object type and/or object name");
        assert_eq!(err.to_string(), "must specify object type and/or object name");
    }

    #[test]
    fn test_io_error_names_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::io(Path::new("/tmp/metadata/package.xml"), io);
        assert!(matches!(err.kind, ErrorKind::Io(_)));
        assert!(err.to_string().contains("/tmp/metadata/package.xml"));
    }

    #[test]
    fn test_transport_error_surfaces_message() {
        let remote = busbar_sf_metadata::Error::new(busbar_sf_metadata::ErrorKind::SoapFault(
            "sf:INVALID_TYPE - Unknown type name 'Bogus'".to_string(),
        ));
        let err: Error = remote.into();
        assert!(matches!(err.kind, ErrorKind::Transport(_)));
        assert!(err.to_string().contains("Unknown type name 'Bogus'"));
    }
}
