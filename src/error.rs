//! Error types for telemetry decoding.
//!
//! All errors implement `std::error::Error` and carry enough structured context to
//! decide what to do next. Errors fall into two groups:
//!
//! - **Setup errors**: raised while loading documents or compiling a layout
//!   (`UnknownChannel`, `UnknownType`, `Document`, `File`, `Parse`, `PacketNotFound`).
//!   These abort the setup path; no partial catalog or layout is ever returned.
//! - **Per-record errors**: raised while encoding or decoding a single buffer
//!   (`SizeMismatch`, `TruncatedRead`). A caller streaming many records can drop the
//!   offending buffer and carry on with the next one.
//!
//! `KeyNotFound`, `TypeMismatch` and `InvalidFourCc` indicate a programming error in
//! the caller and should be surfaced immediately.
//!
//! ```rust
//! use codriver::TelemetryError;
//!
//! let error = TelemetryError::size_mismatch(274, 275);
//! if error.is_recoverable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for telemetry operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("Channel '{channel}' not found in catalog")]
    UnknownChannel { channel: String },

    #[error("Channel '{channel}' declares unsupported type '{type_name}'")]
    UnknownType { channel: String, type_name: String },

    #[error("Invalid record size {actual}, expected {expected}")]
    SizeMismatch { actual: usize, expected: usize },

    #[error(
        "Truncated read for '{channel}' at offset {offset}: needed {needed} bytes, {available} available"
    )]
    TruncatedRead { channel: String, offset: usize, needed: usize, available: usize },

    #[error("Key '{key}' not found in record")]
    KeyNotFound { key: String },

    #[error("Type mismatch for '{channel}': expected {expected}, found {found}")]
    TypeMismatch { channel: String, expected: String, found: String },

    #[error("Invalid FourCC {value:?}: must be exactly 4 bytes")]
    InvalidFourCc { value: String },

    #[error("Telemetry file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Malformed {document} document")]
    Document {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Packet '{packet}' not defined by the loaded structure")]
    PacketNotFound { packet: String },
}

impl TelemetryError {
    /// Returns whether the caller can discard the current buffer and continue with the next.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TelemetryError::SizeMismatch { .. } => true,
            TelemetryError::TruncatedRead { .. } => true,
            TelemetryError::UnknownChannel { .. } => false,
            TelemetryError::UnknownType { .. } => false,
            TelemetryError::KeyNotFound { .. } => false,
            TelemetryError::TypeMismatch { .. } => false,
            TelemetryError::InvalidFourCc { .. } => false,
            TelemetryError::File { .. } => false,
            TelemetryError::Parse { .. } => false,
            TelemetryError::Document { .. } => false,
            TelemetryError::PacketNotFound { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::UnknownChannel { .. } => vec![
                "Check that channels.json matches the packet structure version",
                "Update the telemetry readme documents from the game installation",
            ],
            TelemetryError::UnknownType { .. } => vec![
                "Check the channel type spelling in channels.json",
                "Update the library to a version supporting the declared type",
            ],
            TelemetryError::SizeMismatch { .. } => vec![
                "Discard this buffer and wait for the next one",
                "Verify the game sends the packet structure the layout was built from",
            ],
            TelemetryError::TruncatedRead { .. } => vec![
                "Discard this buffer and wait for the next one",
                "Verify the sender is not fragmenting datagrams",
            ],
            TelemetryError::KeyNotFound { .. } => vec![
                "Check channel id spelling",
                "Verify the channel is part of the record layout",
            ],
            TelemetryError::TypeMismatch { .. } => vec![
                "Use the Rust type matching the channel's declared type",
                "Inspect the layout field type before setting a value",
            ],
            TelemetryError::InvalidFourCc { .. } => {
                vec!["Provide exactly four ASCII characters", "Pad the tag explicitly before setting it"]
            }
            TelemetryError::File { .. } => vec![
                "Check file exists and is readable",
                "Verify the telemetry directory layout",
                "Check file permissions",
            ],
            TelemetryError::Parse { .. } => vec![
                "Check document text encoding",
                "Verify source data integrity",
            ],
            TelemetryError::Document { .. } => vec![
                "Validate the JSON document syntax",
                "Restore the document from the game installation",
            ],
            TelemetryError::PacketNotFound { .. } => vec![
                "Check the packet id in config.json",
                "List the packet ids of the loaded structure",
            ],
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TelemetryError::File { path, source }
    }

    /// Helper constructor for size mismatches.
    pub fn size_mismatch(actual: usize, expected: usize) -> Self {
        TelemetryError::SizeMismatch { actual, expected }
    }

    /// Helper constructor for missing record keys.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        TelemetryError::KeyNotFound { key: key.into() }
    }

    /// Helper constructor for malformed JSON documents.
    pub fn document_error(document: impl Into<String>, source: serde_json::Error) -> Self {
        TelemetryError::Document { document: document.into(), source }
    }
}

impl From<std::io::Error> for TelemetryError {
    fn from(err: std::io::Error) -> Self {
        TelemetryError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn error_messages_carry_their_context(
            channel in "[a-z_]{1,24}",
            type_name in "[a-z0-9]{1,8}",
            actual in 0usize..4096,
            expected in 0usize..4096,
        ) {
            let unknown = TelemetryError::UnknownChannel { channel: channel.clone() };
            prop_assert!(unknown.to_string().contains(&channel));

            let bad_type = TelemetryError::UnknownType {
                channel: channel.clone(),
                type_name: type_name.clone(),
            };
            let msg = bad_type.to_string();
            prop_assert!(msg.contains(&channel));
            prop_assert!(msg.contains(&type_name));

            let size = TelemetryError::size_mismatch(actual, expected);
            let msg = size.to_string();
            prop_assert!(msg.contains(&actual.to_string()));
            prop_assert!(msg.contains(&expected.to_string()));
        }

        #[test]
        fn io_errors_convert_to_file_errors(reason in ".*") {
            let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, reason.clone());
            let converted: TelemetryError = io_err.into();
            match converted {
                TelemetryError::File { source, .. } => {
                    prop_assert_eq!(source.to_string(), reason);
                }
                _ => prop_assert!(false, "Expected File error from io::Error conversion"),
            }
        }
    }

    #[test]
    fn only_per_record_errors_are_recoverable() {
        assert!(TelemetryError::size_mismatch(1, 2).is_recoverable());
        assert!(
            TelemetryError::TruncatedRead {
                channel: "packet_uid".into(),
                offset: 4,
                needed: 8,
                available: 2,
            }
            .is_recoverable()
        );
        assert!(!TelemetryError::UnknownChannel { channel: "x".into() }.is_recoverable());
        assert!(!TelemetryError::key_not_found("x").is_recoverable());
        assert!(!TelemetryError::InvalidFourCc { value: "AB".into() }.is_recoverable());
    }

    #[test]
    fn every_error_has_suggestions() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let errors = vec![
            TelemetryError::UnknownChannel { channel: "x".into() },
            TelemetryError::UnknownType { channel: "x".into(), type_name: "vec3".into() },
            TelemetryError::size_mismatch(1, 2),
            TelemetryError::key_not_found("x"),
            TelemetryError::document_error("channels", json_err),
            TelemetryError::PacketNotFound { packet: "session_update".into() },
        ];

        for error in errors {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty(), "{error} has no suggestions");
            assert!(suggestions.iter().all(|s| s.len() > 5));
        }
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<TelemetryError>();

        let error = TelemetryError::size_mismatch(0, 8);
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn document_errors_expose_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let error = TelemetryError::document_error("ids", json_err);
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(error.to_string(), "Malformed ids document");
    }
}
