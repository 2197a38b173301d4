//! Hybrid signature extension value (OID 2.5.29.212).
//!
//! ```text
//! HybridSignatureValue ::= SEQUENCE {
//!     algorithm   AlgorithmIdentifier,
//!     signature   BIT STRING }
//! ```
//!
//! The DER of this SEQUENCE is carried in the `extnValue` OCTET STRING of an
//! X.509 extension. Field order matters: the identifier comes first.

use std::fmt;

use der::asn1::{BitString, OctetString};
use der::{Decode, Encode, Sequence};
use spki::AlgorithmIdentifierOwned;
use x509_cert::ext::Extension;

use crate::domain::constants::HYBRID_SIGNATURE_OID;
use crate::domain::registry::SecurityCategory;
use crate::infra::error::{HybridError, HybridResult};

/// Wire form of the extension value.
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct HybridSignatureValue {
    algorithm: AlgorithmIdentifierOwned,
    signature: BitString,
}

/// Secondary signature plus the algorithm that produced it.
///
/// Invariant: `signature` is never empty.
#[derive(Clone, Eq, PartialEq)]
pub struct HybridSignature {
    algorithm: AlgorithmIdentifierOwned,
    signature: Box<[u8]>,
}

impl HybridSignature {
    pub fn new(algorithm: AlgorithmIdentifierOwned, signature: Vec<u8>) -> HybridResult<Self> {
        if signature.is_empty() {
            return Err(HybridError::InvalidInput(
                "Hybrid signature must not be empty".to_string(),
            ));
        }
        Ok(Self {
            algorithm,
            signature: signature.into_boxed_slice(),
        })
    }

    #[must_use]
    pub fn algorithm(&self) -> &AlgorithmIdentifierOwned {
        &self.algorithm
    }

    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Registered qTESLA category of the signature algorithm, if any.
    #[must_use]
    pub fn security_category(&self) -> Option<SecurityCategory> {
        SecurityCategory::from_algorithm_identifier(&self.algorithm)
    }

    /// Whether the signature length matches the registry; `None` for
    /// algorithms outside the registry.
    #[must_use]
    pub fn has_expected_length(&self) -> Option<bool> {
        self.security_category()
            .map(|c| c.signature_size() == self.signature.len())
    }

    /// DER of the inner SEQUENCE (the extension value before OCTET STRING wrapping).
    pub fn to_der(&self) -> HybridResult<Vec<u8>> {
        let value = HybridSignatureValue {
            algorithm: self.algorithm.clone(),
            signature: BitString::from_bytes(&self.signature)?,
        };
        Ok(value.to_der()?)
    }

    /// Decode the inner SEQUENCE. Every structural problem is reported as
    /// `MalformedExtension`; no partial recovery is attempted.
    pub fn from_der(bytes: &[u8]) -> HybridResult<Self> {
        let value = HybridSignatureValue::from_der(bytes).map_err(|e| {
            HybridError::MalformedExtension(format!(
                "Expected SEQUENCE {{ AlgorithmIdentifier, BIT STRING }}: {e}"
            ))
        })?;
        if value.signature.unused_bits() != 0 {
            return Err(HybridError::MalformedExtension(format!(
                "Signature BIT STRING has {} unused bits",
                value.signature.unused_bits()
            )));
        }
        Self::new(value.algorithm, value.signature.raw_bytes().to_vec()).map_err(|_| {
            HybridError::MalformedExtension("Signature BIT STRING is empty".to_string())
        })
    }

    /// Wrap as a non-critical X.509 extension.
    pub fn to_extension(&self) -> HybridResult<Extension> {
        Ok(Extension {
            extn_id: HYBRID_SIGNATURE_OID,
            critical: false,
            extn_value: OctetString::new(self.to_der()?)?,
        })
    }

    pub fn from_extension(extension: &Extension) -> HybridResult<Self> {
        if extension.extn_id != HYBRID_SIGNATURE_OID {
            return Err(HybridError::MalformedExtension(format!(
                "Expected extension {HYBRID_SIGNATURE_OID}, found {}",
                extension.extn_id
            )));
        }
        Self::from_der(extension.extn_value.as_bytes())
    }
}

impl fmt::Debug for HybridSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HybridSignature(algo={}, len={})",
            self.algorithm.oid,
            self.signature.len()
        )
    }
}
