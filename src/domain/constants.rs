//! Centralized object identifiers for the hybrid certificate extensions.
//! Keep this intentionally small; only broadly reused identifiers should live here.

use der::asn1::ObjectIdentifier;

// === Hybrid Extensions ===

/// Hybrid signature extension OID (2.5.29.212), dotted form.
pub const HYBRID_SIGNATURE_OID_STR: &str = "2.5.29.212";

/// Hybrid signature extension OID (2.5.29.212).
pub const HYBRID_SIGNATURE_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap(HYBRID_SIGNATURE_OID_STR);

/// Hybrid (secondary) public key extension OID (2.5.29.211), dotted form.
pub const HYBRID_KEY_OID_STR: &str = "2.5.29.211";

/// Hybrid (secondary) public key extension OID (2.5.29.211).
pub const HYBRID_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap(HYBRID_KEY_OID_STR);

// === PKCS#9 ===

/// PKCS#9 extensionRequest attribute OID (1.2.840.113549.1.9.14), dotted form.
pub const PKCS9_EXTENSION_REQUEST_OID_STR: &str = "1.2.840.113549.1.9.14";

/// PKCS#9 extensionRequest attribute OID (1.2.840.113549.1.9.14).
pub const PKCS9_EXTENSION_REQUEST_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap(PKCS9_EXTENSION_REQUEST_OID_STR);

// === qTESLA (Microsoft arc 1.3.6.1.4.1.311.89.2.2) ===

/// qTESLA heuristic category I
pub const QTESLA_HEURISTIC_I_OID_STR: &str = "1.3.6.1.4.1.311.89.2.2.1";

/// qTESLA heuristic category III, size-optimized
pub const QTESLA_HEURISTIC_III_SIZE_OID_STR: &str = "1.3.6.1.4.1.311.89.2.2.2";

/// qTESLA heuristic category III, speed-optimized
pub const QTESLA_HEURISTIC_III_SPEED_OID_STR: &str = "1.3.6.1.4.1.311.89.2.2.3";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hybrid_extension_oids_are_distinct() {
        assert_ne!(HYBRID_SIGNATURE_OID, HYBRID_KEY_OID);
        assert_eq!(HYBRID_SIGNATURE_OID.to_string(), HYBRID_SIGNATURE_OID_STR);
        assert_eq!(HYBRID_KEY_OID.to_string(), HYBRID_KEY_OID_STR);
        assert_eq!(
            PKCS9_EXTENSION_REQUEST_OID.to_string(),
            PKCS9_EXTENSION_REQUEST_OID_STR
        );
    }
}
