//! Signing capabilities injected into the build pipeline.
//!
//! The signature algorithms themselves live outside this crate; the pipeline
//! only hands bytes to these traits and takes bytes back.

use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use crate::infra::error::HybridResult;

/// Produces the outer (primary) certificate signature.
pub trait PrimarySigner {
    /// Identifier written to both `TBSCertificate.signature` and
    /// `Certificate.signatureAlgorithm`.
    fn algorithm_identifier(&self) -> AlgorithmIdentifierOwned;

    /// Sign the DER-encoded `TBSCertificate`.
    fn sign(&self, tbs_der: &[u8]) -> HybridResult<Vec<u8>>;
}

/// Produces the secondary signature carried in the hybrid signature extension.
pub trait SecondarySigner {
    fn algorithm_identifier(&self) -> AlgorithmIdentifierOwned;

    /// Exact length of every signature this signer produces.
    fn signature_size(&self) -> usize;

    fn sign(&self, message: &[u8]) -> HybridResult<Vec<u8>>;
}

/// Relying-party check for secondary signatures.
pub trait SecondaryVerifier {
    fn verify(
        &self,
        algorithm: &AlgorithmIdentifierOwned,
        message: &[u8],
        signature: &[u8],
        public_key: &SubjectPublicKeyInfoOwned,
    ) -> HybridResult<bool>;
}
