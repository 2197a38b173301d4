//! Verification service: relying-party checks on the secondary signature.
//!
//! The secondary signature covers the TBS exactly as the issuer had it before
//! the hybrid signature extension was appended. This service rebuilds that
//! content, extracts key and signature, and aggregates the outcomes into a
//! `HybridVerificationReport`.

use der::Encode;
use x509_cert::Certificate;

use crate::domain::constants::HYBRID_SIGNATURE_OID;
use crate::domain::hybrid::{HybridKey, HybridSignature};
use crate::domain::registry::SecurityCategory;
use crate::domain::verification::HybridVerificationReport;
use crate::infra::error::{HybridError, HybridResult};
use crate::services::extraction;
use crate::services::signer::SecondaryVerifier;

/// Service verifying the secondary half of hybrid certificates.
pub struct VerificationService {
    enforce_signature_length: bool,
}

impl Default for VerificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            enforce_signature_length: true,
        }
    }

    /// When disabled, a registry length mismatch is logged but still reported
    /// as `length_ok`.
    #[must_use]
    pub fn with_length_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_signature_length = enforce;
        self
    }

    /// DER of the TBS without the hybrid signature extension.
    pub fn secondary_signed_content(certificate: &Certificate) -> HybridResult<Vec<u8>> {
        let mut tbs = certificate.tbs_certificate.clone();
        let extensions = tbs
            .extensions
            .take()
            .ok_or_else(|| HybridError::ExtensionNotFound(HYBRID_SIGNATURE_OID.to_string()))?;
        let before = extensions.len();
        let remaining: Vec<_> = extensions
            .into_iter()
            .filter(|ext| ext.extn_id != HYBRID_SIGNATURE_OID)
            .collect();
        if remaining.len() == before {
            return Err(HybridError::ExtensionNotFound(
                HYBRID_SIGNATURE_OID.to_string(),
            ));
        }
        if !remaining.is_empty() {
            tbs.extensions = Some(remaining);
        }
        Ok(tbs.to_der()?)
    }

    /// qTESLA keys and signatures share one OID per category, so both must
    /// name the same category. Other algorithms use distinct key and
    /// signature OIDs; their pairing is left to the verifier.
    fn key_matches_signature(key: &HybridKey, signature: &HybridSignature) -> bool {
        let key_category =
            SecurityCategory::from_algorithm_identifier(&key.subject_public_key_info().algorithm);
        match (key_category, signature.security_category()) {
            (Some(k), Some(s)) => k == s,
            (None, None) => true,
            _ => false,
        }
    }

    /// Verify the secondary signature of `certificate` with `verifier`.
    ///
    /// Missing or malformed hybrid extensions are errors, never a "not hybrid"
    /// report.
    pub fn verify_hybrid(
        &self,
        certificate: &Certificate,
        verifier: &dyn SecondaryVerifier,
    ) -> HybridResult<HybridVerificationReport> {
        let signature = extraction::from_certificate(certificate)?;
        let key = HybridKey::from_certificate(certificate)?;
        let content = Self::secondary_signed_content(certificate)?;

        let key_ok = Self::key_matches_signature(&key, &signature);
        if !key_ok {
            log::warn!(
                "Hybrid key algorithm {} does not match signature algorithm {}",
                key.subject_public_key_info().algorithm.oid,
                signature.algorithm().oid
            );
        }

        let length_ok = match signature.has_expected_length() {
            Some(true) | None => true,
            Some(false) => {
                log::warn!(
                    "Hybrid signature length {} does not match registry for {}",
                    signature.signature().len(),
                    signature.algorithm().oid
                );
                !self.enforce_signature_length
            }
        };

        let signature_ok = verifier.verify(
            signature.algorithm(),
            &content,
            signature.signature(),
            key.subject_public_key_info(),
        )?;
        if !signature_ok {
            log::warn!("Secondary signature did not verify");
        }

        Ok(HybridVerificationReport {
            category: signature.security_category(),
            signature_len: signature.signature().len(),
            key_ok,
            length_ok,
            signature_ok,
        })
    }
}
