//! Verification domain types for hybrid certificates.
//!
//! Aggregates results from the relying-party checks. The secondary signature
//! math is delegated to an injected verifier.

use crate::domain::registry::SecurityCategory;

/// Result of verifying the secondary half of a hybrid certificate.
///
/// - `key_ok`: a qTESLA key and signature name the same category; a key and
///   signature outside the registry are not paired here
/// - `length_ok`: the signature length matches the registry (true for
///   algorithms outside the registry, which have no fixed length)
/// - `signature_ok`: the secondary verifier accepted the signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridVerificationReport {
    /// Registered category of the secondary algorithm, if any.
    pub category: Option<SecurityCategory>,
    /// Length of the extracted secondary signature.
    pub signature_len: usize,
    pub key_ok: bool,
    pub length_ok: bool,
    pub signature_ok: bool,
}

impl HybridVerificationReport {
    /// Overall success indicator - returns true only if all checks passed.
    #[must_use]
    pub fn success(&self) -> bool {
        self.key_ok && self.length_ok && self.signature_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_requires_all_checks() {
        let mut report = HybridVerificationReport {
            category: Some(SecurityCategory::HeuristicI),
            signature_len: 1376,
            key_ok: true,
            length_ok: true,
            signature_ok: true,
        };
        assert!(report.success());
        report.length_ok = false;
        assert!(!report.success());
    }
}
