//! Service layer module root.
//! Contains extraction, build pipeline and verification services.

pub mod extraction;
pub mod hybrid_builder;
pub mod signer;
pub mod tbs_builder;
pub mod verification;

pub use hybrid_builder::{HybridCertificateBuilder, HybridKeyHook, HybridPreparedTbs};
pub use signer::{PrimarySigner, SecondarySigner, SecondaryVerifier};
pub use tbs_builder::{CertificateBuilder, PreSigningHook, PreparedTbs};
pub use verification::VerificationService;
