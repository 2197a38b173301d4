//! qTESLA algorithm registry.
//!
//! Maps the closed set of qTESLA security categories to their object
//! identifiers and fixed key/signature sizes, and back. Pure lookups: no state,
//! no I/O, safe to share between threads.

use std::fmt;
use std::str::FromStr;

use der::asn1::ObjectIdentifier;
use spki::AlgorithmIdentifierOwned;

use crate::domain::constants::{
    QTESLA_HEURISTIC_III_SIZE_OID_STR, QTESLA_HEURISTIC_III_SPEED_OID_STR,
    QTESLA_HEURISTIC_I_OID_STR,
};

/// qTESLA parameter sets recognised for secondary signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityCategory {
    /// Heuristic, category I
    HeuristicI,
    /// Heuristic, category III, size-optimized
    HeuristicIIISize,
    /// Heuristic, category III, speed-optimized
    HeuristicIIISpeed,
}

impl SecurityCategory {
    /// Every known category, in code order.
    pub const ALL: [SecurityCategory; 3] = [
        SecurityCategory::HeuristicI,
        SecurityCategory::HeuristicIIISize,
        SecurityCategory::HeuristicIIISpeed,
    ];

    /// Look up a category by dotted OID string. Unknown or malformed input
    /// yields `None`.
    #[must_use]
    pub fn identify(oid: &str) -> Option<Self> {
        match oid {
            QTESLA_HEURISTIC_I_OID_STR => Some(SecurityCategory::HeuristicI),
            QTESLA_HEURISTIC_III_SIZE_OID_STR => Some(SecurityCategory::HeuristicIIISize),
            QTESLA_HEURISTIC_III_SPEED_OID_STR => Some(SecurityCategory::HeuristicIIISpeed),
            _ => None,
        }
    }

    /// Look up a category from an algorithm identifier (parameters ignored).
    #[must_use]
    pub fn from_algorithm_identifier(algorithm: &AlgorithmIdentifierOwned) -> Option<Self> {
        Self::identify(&algorithm.oid.to_string())
    }

    /// Legacy integer codes used by older encoders (0, 1, 2).
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(SecurityCategory::HeuristicI),
            1 => Some(SecurityCategory::HeuristicIIISize),
            2 => Some(SecurityCategory::HeuristicIIISpeed),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            SecurityCategory::HeuristicI => 0,
            SecurityCategory::HeuristicIIISize => 1,
            SecurityCategory::HeuristicIIISpeed => 2,
        }
    }

    /// Dotted OID string for this category.
    #[must_use]
    pub fn oid(self) -> &'static str {
        match self {
            SecurityCategory::HeuristicI => QTESLA_HEURISTIC_I_OID_STR,
            SecurityCategory::HeuristicIIISize => QTESLA_HEURISTIC_III_SIZE_OID_STR,
            SecurityCategory::HeuristicIIISpeed => QTESLA_HEURISTIC_III_SPEED_OID_STR,
        }
    }

    /// Signature length in bytes for this parameter set.
    #[must_use]
    pub fn signature_size(self) -> usize {
        match self {
            SecurityCategory::HeuristicI => 1376,
            SecurityCategory::HeuristicIIISize => 2720,
            SecurityCategory::HeuristicIIISpeed => 2848,
        }
    }

    /// Encoded public key length in bytes for this parameter set.
    #[must_use]
    pub fn public_key_size(self) -> usize {
        match self {
            SecurityCategory::HeuristicI => 1504,
            SecurityCategory::HeuristicIIISize => 2976,
            SecurityCategory::HeuristicIIISpeed => 3104,
        }
    }

    /// Encoded secret key length in bytes for this parameter set.
    #[must_use]
    pub fn private_key_size(self) -> usize {
        match self {
            SecurityCategory::HeuristicI => 1344,
            SecurityCategory::HeuristicIIISize => 2112,
            SecurityCategory::HeuristicIIISpeed => 2368,
        }
    }

    /// Fresh algorithm identifier without parameters.
    #[must_use]
    pub fn algorithm_identifier(self) -> AlgorithmIdentifierOwned {
        AlgorithmIdentifierOwned {
            oid: self.object_identifier(),
            parameters: None,
        }
    }

    #[must_use]
    pub fn object_identifier(self) -> ObjectIdentifier {
        // The three dotted strings are compile-time constants in valid form.
        match self {
            SecurityCategory::HeuristicI => ObjectIdentifier::new_unwrap(QTESLA_HEURISTIC_I_OID_STR),
            SecurityCategory::HeuristicIIISize => {
                ObjectIdentifier::new_unwrap(QTESLA_HEURISTIC_III_SIZE_OID_STR)
            }
            SecurityCategory::HeuristicIIISpeed => {
                ObjectIdentifier::new_unwrap(QTESLA_HEURISTIC_III_SPEED_OID_STR)
            }
        }
    }

    /// Short name used in configuration files and CLI output.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SecurityCategory::HeuristicI => "heuristic-i",
            SecurityCategory::HeuristicIIISize => "heuristic-iii-size",
            SecurityCategory::HeuristicIIISpeed => "heuristic-iii-speed",
        }
    }
}

/// OID for a raw integer category code; unknown codes yield `""`.
#[must_use]
pub fn oid_for_code(code: i32) -> &'static str {
    SecurityCategory::from_code(code).map_or("", SecurityCategory::oid)
}

/// True when the identifier names one of the registered qTESLA categories.
#[must_use]
pub fn is_qtesla(algorithm: &AlgorithmIdentifierOwned) -> bool {
    SecurityCategory::from_algorithm_identifier(algorithm).is_some()
}

impl fmt::Display for SecurityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SecurityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        SecurityCategory::ALL
            .into_iter()
            .find(|c| c.name() == lowered || c.oid() == lowered)
            .ok_or_else(|| format!("Unknown qTESLA security category: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identify_is_inverse_of_oid() {
        for category in SecurityCategory::ALL {
            assert_eq!(SecurityCategory::identify(category.oid()), Some(category));
        }
    }

    #[test]
    fn identify_unknown_strings() {
        assert_eq!(SecurityCategory::identify(""), None);
        assert_eq!(SecurityCategory::identify("1.3.6.1.4.1.311.89.2.2.4"), None);
        assert_eq!(SecurityCategory::identify("not an oid"), None);
        assert_eq!(SecurityCategory::identify(" 1.3.6.1.4.1.311.89.2.2.1"), None);
    }

    #[test]
    fn signature_sizes_are_fixed() {
        assert_eq!(SecurityCategory::HeuristicI.signature_size(), 1376);
        assert_eq!(SecurityCategory::HeuristicIIISize.signature_size(), 2720);
        assert_eq!(SecurityCategory::HeuristicIIISpeed.signature_size(), 2848);
    }

    #[test]
    fn private_key_sizes_are_fixed() {
        assert_eq!(SecurityCategory::HeuristicI.private_key_size(), 1344);
        assert_eq!(SecurityCategory::HeuristicIIISize.private_key_size(), 2112);
        assert_eq!(SecurityCategory::HeuristicIIISpeed.private_key_size(), 2368);
    }

    #[test]
    fn legacy_codes() {
        for category in SecurityCategory::ALL {
            assert_eq!(SecurityCategory::from_code(category.code()), Some(category));
            assert_eq!(oid_for_code(category.code()), category.oid());
        }
        assert_eq!(SecurityCategory::from_code(-1), None);
        assert_eq!(oid_for_code(7), "");
    }

    #[test]
    fn algorithm_identifier_has_no_parameters() {
        let alg = SecurityCategory::HeuristicIIISize.algorithm_identifier();
        assert!(alg.parameters.is_none());
        assert_eq!(alg.oid.to_string(), "1.3.6.1.4.1.311.89.2.2.2");
        assert!(is_qtesla(&alg));
        assert_eq!(
            SecurityCategory::from_algorithm_identifier(&alg),
            Some(SecurityCategory::HeuristicIIISize)
        );
    }

    #[test]
    fn parse_from_name_or_oid() {
        assert_eq!(
            "heuristic-iii-speed".parse::<SecurityCategory>(),
            Ok(SecurityCategory::HeuristicIIISpeed)
        );
        assert_eq!(
            "1.3.6.1.4.1.311.89.2.2.1".parse::<SecurityCategory>(),
            Ok(SecurityCategory::HeuristicI)
        );
        assert!("sha256".parse::<SecurityCategory>().is_err());
    }
}
