//! Error types for hybrid certificate operations.
//! Error handling types and result definitions for encoding, extraction and building.

use thiserror::Error;

/// Result type for hybrid certificate operations
pub type HybridResult<T> = Result<T, HybridError>;

/// Error taxonomy for hybrid certificate operations.
///
/// Absence of an extension request attribute on a CSR is not an error; it is
/// reported as `Ok(None)` by the extraction service.
#[derive(Error, Debug, miette::Diagnostic)]
pub enum HybridError {
    #[error("Extension not found: {0}")]
    ExtensionNotFound(String),

    #[error("Extension request does not contain the hybrid signature extension: {0}")]
    RequestExtensionNotFound(String),

    #[error("Malformed extension: {0}")]
    MalformedExtension(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Extension insertion failed: {0}")]
    ExtensionInsertionFailure(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Signature error: {0}")]
    SignatureError(String),

    #[error("ASN.1 encoding/decoding error: {0}")]
    Asn1Error(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<der::Error> for HybridError {
    fn from(error: der::Error) -> Self {
        HybridError::Asn1Error(error.to_string())
    }
}

impl From<der::oid::Error> for HybridError {
    fn from(error: der::oid::Error) -> Self {
        HybridError::InvalidInput(format!("Invalid object identifier: {error}"))
    }
}

impl From<std::io::Error> for HybridError {
    fn from(error: std::io::Error) -> Self {
        HybridError::IoError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = HybridError::ExtensionNotFound("2.5.29.212".to_string());
        assert_eq!(error.to_string(), "Extension not found: 2.5.29.212");

        let error = HybridError::UnsupportedOperation("single signature build".to_string());
        assert_eq!(
            error.to_string(),
            "Unsupported operation: single signature build"
        );
    }

    #[test]
    fn test_error_conversion() {
        let oid_error = der::asn1::ObjectIdentifier::new("not-an-oid").unwrap_err();
        let hybrid_error: HybridError = oid_error.into();
        assert!(matches!(hybrid_error, HybridError::InvalidInput(_)));

        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let hybrid_error: HybridError = io_error.into();
        match hybrid_error {
            HybridError::IoError(msg) => assert_eq!(msg, "missing"),
            _ => panic!("Wrong error type"),
        }
    }
}
