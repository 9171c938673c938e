//! Error types for the steward coordinator

use std::path::PathBuf;

use thiserror::Error;

use crate::commands::CommandError;
use crate::devices::AddressParseError;

/// Result type alias for steward operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the steward coordinator
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// The device snapshot could not be read, parsed or durably written
    ///
    /// The in-memory registry is left untouched, but the process can no
    /// longer guarantee durability and must stop.
    #[error("device registry persistence failed at {}: {reason}", path.display())]
    Persistence {
        path: PathBuf,
        reason: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Malformed device address
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressParseError),

    /// Command dispatch error
    #[error(transparent)]
    Command(#[from] CommandError),
}

impl Error {
    /// Build a persistence error for the snapshot at `path`
    pub(crate) fn persistence<E>(path: impl Into<PathBuf>, reason: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Persistence {
            path: path.into(),
            reason: reason.to_string(),
            source: Box::new(source),
        }
    }

    /// Whether the process must stop after seeing this error
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_is_fatal() {
        let err = Error::persistence(
            "/tmp/devices.json",
            "can't write database",
            std::io::Error::other("disk full"),
        );
        assert!(err.is_fatal());
        assert!(err.to_string().contains("/tmp/devices.json"));
        assert!(err.to_string().contains("can't write database"));
    }

    #[test]
    fn address_errors_convert() {
        fn parse(s: &str) -> Result<crate::devices::IeeeAddress> {
            Ok(s.parse()?)
        }

        assert!(parse("00:11:22:33:44:55:66:77").is_ok());
        let err = parse("0x1234zz").unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn config_is_not_fatal() {
        assert!(!Error::Config("bad timeout".to_string()).is_fatal());
    }
}
