//! Hybrid X.509 Library
//!
//! Secondary (hybrid) signatures and secondary public keys for X.509
//! certificates and PKCS#10 requests. A relying party that only knows the
//! primary algorithm validates the certificate as usual; a hybrid-aware party
//! also extracts and verifies the secondary signature.
//!
//! - `domain`: registry of qTESLA categories, extension value types
//! - `services`: extraction, build pipeline with pre-signing hooks, verification
//! - `pipelines`: file-level inspection workflow
//! - `infra`: errors and configuration

pub mod domain;
pub mod infra;
pub mod pipelines;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::constants::{
    HYBRID_KEY_OID, HYBRID_KEY_OID_STR, HYBRID_SIGNATURE_OID, HYBRID_SIGNATURE_OID_STR,
    PKCS9_EXTENSION_REQUEST_OID,
};
pub use domain::hybrid::{
    HybridKey, HybridSignature, QteslaPrivateKey, QteslaPublicKey, SecondaryPublicKey,
};
pub use domain::registry::{is_qtesla, oid_for_code, SecurityCategory};
pub use domain::verification::HybridVerificationReport;
pub use infra::config::{ConfigManager, HybridConfiguration, OutputFormat};
pub use infra::error::{HybridError, HybridResult};
pub use pipelines::{InspectWorkflow, InspectionReport, SourceKind};
pub use services::extraction::{
    extension_request_attribute, from_certificate, from_certificate_der, from_signing_request,
    from_signing_request_der, from_signing_request_pem,
};
pub use services::{
    CertificateBuilder, HybridCertificateBuilder, HybridKeyHook, HybridPreparedTbs,
    PreSigningHook, PreparedTbs, PrimarySigner, SecondarySigner, SecondaryVerifier,
    VerificationService,
};
