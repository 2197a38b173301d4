//! Hybrid key extension (OID 2.5.29.211).
//!
//! The secondary public key travels as a DER `SubjectPublicKeyInfo` inside the
//! extension's OCTET STRING.

use std::fmt;

use der::asn1::{BitString, OctetString};
use der::{Decode, Encode};
use spki::SubjectPublicKeyInfoOwned;
use x509_cert::ext::Extension;
use x509_cert::Certificate;

use crate::domain::constants::HYBRID_KEY_OID;
use crate::domain::registry::SecurityCategory;
use crate::infra::error::{HybridError, HybridResult};

/// Anything that can render itself as the hybrid key extension's
/// `SubjectPublicKeyInfo`.
pub trait SecondaryPublicKey {
    fn to_subject_public_key_info(&self) -> HybridResult<SubjectPublicKeyInfoOwned>;
}

impl SecondaryPublicKey for SubjectPublicKeyInfoOwned {
    fn to_subject_public_key_info(&self) -> HybridResult<SubjectPublicKeyInfoOwned> {
        Ok(self.clone())
    }
}

/// qTESLA public key: the raw public data of one security category.
///
/// Invariant: `data.len() == category.public_key_size()`.
#[derive(Clone, Eq, PartialEq)]
pub struct QteslaPublicKey {
    category: SecurityCategory,
    data: Box<[u8]>,
}

impl QteslaPublicKey {
    pub fn new(category: SecurityCategory, data: Vec<u8>) -> HybridResult<Self> {
        if data.len() != category.public_key_size() {
            return Err(HybridError::InvalidInput(format!(
                "{category} public key must be {} bytes, got {}",
                category.public_key_size(),
                data.len()
            )));
        }
        Ok(Self {
            category,
            data: data.into_boxed_slice(),
        })
    }

    #[must_use]
    pub fn category(&self) -> SecurityCategory {
        self.category
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn from_subject_public_key_info(spki: &SubjectPublicKeyInfoOwned) -> HybridResult<Self> {
        let category = SecurityCategory::from_algorithm_identifier(&spki.algorithm)
            .ok_or_else(|| HybridError::UnsupportedAlgorithm(spki.algorithm.oid.to_string()))?;
        let data = spki.subject_public_key.as_bytes().ok_or_else(|| {
            HybridError::MalformedExtension(
                "qTESLA public key BIT STRING has unused bits".to_string(),
            )
        })?;
        Self::new(category, data.to_vec())
    }
}

impl SecondaryPublicKey for QteslaPublicKey {
    fn to_subject_public_key_info(&self) -> HybridResult<SubjectPublicKeyInfoOwned> {
        Ok(SubjectPublicKeyInfoOwned {
            algorithm: self.category.algorithm_identifier(),
            subject_public_key: BitString::from_bytes(&self.data)?,
        })
    }
}

impl fmt::Debug for QteslaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QteslaPublicKey(category={}, len={})",
            self.category,
            self.data.len()
        )
    }
}

/// qTESLA secret key of one security category.
///
/// Encoded on its own as a DER BIT STRING of the secret bytes. The category
/// is not part of the encoding and must be supplied when decoding.
#[derive(Clone, Eq, PartialEq)]
pub struct QteslaPrivateKey {
    category: SecurityCategory,
    secret: Box<[u8]>,
}

impl QteslaPrivateKey {
    pub fn new(category: SecurityCategory, secret: Vec<u8>) -> HybridResult<Self> {
        if secret.len() != category.private_key_size() {
            return Err(HybridError::InvalidInput(format!(
                "{category} private key must be {} bytes, got {}",
                category.private_key_size(),
                secret.len()
            )));
        }
        Ok(Self {
            category,
            secret: secret.into_boxed_slice(),
        })
    }

    #[must_use]
    pub fn category(&self) -> SecurityCategory {
        self.category
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.secret
    }

    pub fn to_der(&self) -> HybridResult<Vec<u8>> {
        Ok(BitString::from_bytes(&self.secret)?.to_der()?)
    }

    pub fn from_der(der: &[u8], category: SecurityCategory) -> HybridResult<Self> {
        let bits = BitString::from_der(der)?;
        let secret = bits.as_bytes().ok_or_else(|| {
            HybridError::InvalidInput("qTESLA private key BIT STRING has unused bits".to_string())
        })?;
        Self::new(category, secret.to_vec())
    }
}

impl fmt::Debug for QteslaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QteslaPrivateKey(category={}, ..)", self.category)
    }
}

/// The secondary public key carried by a hybrid certificate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HybridKey {
    spki: SubjectPublicKeyInfoOwned,
}

impl HybridKey {
    #[must_use]
    pub fn new(spki: SubjectPublicKeyInfoOwned) -> Self {
        Self { spki }
    }

    pub fn from_public_key(key: &dyn SecondaryPublicKey) -> HybridResult<Self> {
        Ok(Self::new(key.to_subject_public_key_info()?))
    }

    pub fn from_qtesla(key: &QteslaPublicKey) -> HybridResult<Self> {
        Self::from_public_key(key)
    }

    #[must_use]
    pub fn subject_public_key_info(&self) -> &SubjectPublicKeyInfoOwned {
        &self.spki
    }

    /// Interpret the key as qTESLA; fails for other algorithms.
    pub fn to_qtesla(&self) -> HybridResult<QteslaPublicKey> {
        QteslaPublicKey::from_subject_public_key_info(&self.spki)
    }

    pub fn to_extension(&self, critical: bool) -> HybridResult<Extension> {
        Ok(Extension {
            extn_id: HYBRID_KEY_OID,
            critical,
            extn_value: OctetString::new(self.spki.to_der()?)?,
        })
    }

    pub fn from_extension(extension: &Extension) -> HybridResult<Self> {
        if extension.extn_id != HYBRID_KEY_OID {
            return Err(HybridError::MalformedExtension(format!(
                "Expected extension {HYBRID_KEY_OID}, found {}",
                extension.extn_id
            )));
        }
        let spki = SubjectPublicKeyInfoOwned::from_der(extension.extn_value.as_bytes())
            .map_err(|e| {
                HybridError::MalformedExtension(format!(
                    "Hybrid key is not a SubjectPublicKeyInfo: {e}"
                ))
            })?;
        Ok(Self::new(spki))
    }

    pub fn from_certificate(certificate: &Certificate) -> HybridResult<Self> {
        let extension = certificate
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .find(|ext| ext.extn_id == HYBRID_KEY_OID)
            .ok_or_else(|| HybridError::ExtensionNotFound(HYBRID_KEY_OID.to_string()))?;
        Self::from_extension(extension)
    }
}
