//! Shared fixtures for integration tests.
//!
//! The signers below are deterministic stand-ins built on SHA-2 digests. They
//! produce byte strings of the right length for the algorithm they claim, which
//! is all the hybrid pipeline inspects.

#![allow(dead_code)]

use std::cell::RefCell;
use std::str::FromStr;
use std::time::Duration;

use der::asn1::{BitString, ObjectIdentifier};
use hybrid_x509::{
    CertificateBuilder, HybridCertificateBuilder, HybridError, HybridResult, PrimarySigner,
    QteslaPublicKey, SecondarySigner, SecondaryVerifier, SecurityCategory,
};
use sha2::{Digest, Sha256, Sha512};
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::attr::Attributes;
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::request::{CertReq, CertReqInfo};
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::Validity;
use x509_cert::Certificate;

pub const ECDSA_WITH_SHA256: &str = "1.2.840.10045.4.3.2";
pub const EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";

/// Primary signer: "signature" is SHA-256 of the TBS. Records every input.
#[derive(Default)]
pub struct DigestPrimarySigner {
    pub seen: RefCell<Vec<Vec<u8>>>,
}

impl PrimarySigner for DigestPrimarySigner {
    fn algorithm_identifier(&self) -> AlgorithmIdentifierOwned {
        AlgorithmIdentifierOwned {
            oid: ObjectIdentifier::new_unwrap(ECDSA_WITH_SHA256),
            parameters: None,
        }
    }

    fn sign(&self, tbs_der: &[u8]) -> HybridResult<Vec<u8>> {
        self.seen.borrow_mut().push(tbs_der.to_vec());
        Ok(Sha256::digest(tbs_der).to_vec())
    }
}

/// Expand SHA-512 of `message` to `len` bytes.
pub fn expand_digest(message: &[u8], len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut counter = 0u32;
    while out.len() < len {
        let mut hasher = Sha512::new();
        hasher.update(counter.to_be_bytes());
        hasher.update(message);
        out.extend_from_slice(&hasher.finalize());
        counter += 1;
    }
    out.truncate(len);
    out
}

/// Secondary signer with a qTESLA-shaped output.
pub struct FakeQteslaSigner {
    pub category: SecurityCategory,
    /// Overrides the produced length when set.
    pub produced_len: Option<usize>,
    pub seen: RefCell<Vec<Vec<u8>>>,
}

impl FakeQteslaSigner {
    pub fn new(category: SecurityCategory) -> Self {
        Self {
            category,
            produced_len: None,
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl SecondarySigner for FakeQteslaSigner {
    fn algorithm_identifier(&self) -> AlgorithmIdentifierOwned {
        self.category.algorithm_identifier()
    }

    fn signature_size(&self) -> usize {
        self.category.signature_size()
    }

    fn sign(&self, message: &[u8]) -> HybridResult<Vec<u8>> {
        self.seen.borrow_mut().push(message.to_vec());
        let len = self.produced_len.unwrap_or(self.category.signature_size());
        Ok(expand_digest(message, len))
    }
}

/// Verifier matching `FakeQteslaSigner`.
pub struct FakeQteslaVerifier;

impl SecondaryVerifier for FakeQteslaVerifier {
    fn verify(
        &self,
        algorithm: &AlgorithmIdentifierOwned,
        message: &[u8],
        signature: &[u8],
        public_key: &SubjectPublicKeyInfoOwned,
    ) -> HybridResult<bool> {
        if SecurityCategory::from_algorithm_identifier(algorithm).is_none() {
            return Err(HybridError::UnsupportedAlgorithm(algorithm.oid.to_string()));
        }
        if public_key.algorithm.oid != algorithm.oid {
            return Ok(false);
        }
        Ok(expand_digest(message, signature.len()) == signature)
    }
}

/// Secondary signer shaped like ECDSA P-256: distinct key and signature OIDs,
/// 64 byte output.
#[derive(Default)]
pub struct FakeEcdsaSigner {
    pub seen: RefCell<Vec<Vec<u8>>>,
}

pub const FAKE_ECDSA_SIGNATURE_LEN: usize = 64;

impl SecondarySigner for FakeEcdsaSigner {
    fn algorithm_identifier(&self) -> AlgorithmIdentifierOwned {
        AlgorithmIdentifierOwned {
            oid: ObjectIdentifier::new_unwrap(ECDSA_WITH_SHA256),
            parameters: None,
        }
    }

    fn signature_size(&self) -> usize {
        FAKE_ECDSA_SIGNATURE_LEN
    }

    fn sign(&self, message: &[u8]) -> HybridResult<Vec<u8>> {
        self.seen.borrow_mut().push(message.to_vec());
        Ok(expand_digest(message, FAKE_ECDSA_SIGNATURE_LEN))
    }
}

/// Verifier matching `FakeEcdsaSigner`; pairs ecPublicKey with ecdsa-with-SHA256.
pub struct FakeEcdsaVerifier;

impl SecondaryVerifier for FakeEcdsaVerifier {
    fn verify(
        &self,
        algorithm: &AlgorithmIdentifierOwned,
        message: &[u8],
        signature: &[u8],
        public_key: &SubjectPublicKeyInfoOwned,
    ) -> HybridResult<bool> {
        if algorithm.oid.to_string() != ECDSA_WITH_SHA256 {
            return Err(HybridError::UnsupportedAlgorithm(algorithm.oid.to_string()));
        }
        if public_key.algorithm.oid.to_string() != EC_PUBLIC_KEY {
            return Ok(false);
        }
        Ok(expand_digest(message, signature.len()) == signature)
    }
}

pub fn name(dn: &str) -> Name {
    Name::from_str(dn).expect("valid distinguished name")
}

pub fn primary_spki() -> SubjectPublicKeyInfoOwned {
    SubjectPublicKeyInfoOwned {
        algorithm: AlgorithmIdentifierOwned {
            oid: ObjectIdentifier::new_unwrap(EC_PUBLIC_KEY),
            parameters: None,
        },
        subject_public_key: BitString::from_bytes(&[0x04; 65]).expect("bit string"),
    }
}

pub fn qtesla_key(category: SecurityCategory) -> QteslaPublicKey {
    QteslaPublicKey::new(category, vec![0x5A; category.public_key_size()]).expect("key size")
}

pub fn validity() -> Validity {
    Validity::from_now(Duration::from_secs(30 * 24 * 3600)).expect("validity")
}

pub fn hybrid_builder(category: SecurityCategory) -> HybridCertificateBuilder {
    HybridCertificateBuilder::new(
        name("CN=Hybrid Test CA,O=Example"),
        SerialNumber::new(&[0x01, 0x02, 0x03]).expect("serial"),
        validity(),
        name("CN=hybrid.example.com"),
        primary_spki(),
        &qtesla_key(category),
    )
    .expect("hybrid builder")
}

/// Hybrid builder whose secondary key is a classical EC key.
pub fn ecdsa_hybrid_builder() -> HybridCertificateBuilder {
    let secondary = SubjectPublicKeyInfoOwned {
        algorithm: AlgorithmIdentifierOwned {
            oid: ObjectIdentifier::new_unwrap(EC_PUBLIC_KEY),
            parameters: None,
        },
        subject_public_key: BitString::from_bytes(&[0x04; 65]).expect("bit string"),
    };
    HybridCertificateBuilder::new(
        name("CN=Hybrid Test CA,O=Example"),
        SerialNumber::new(&[0x0E, 0xCD]).expect("serial"),
        validity(),
        name("CN=ecdsa-hybrid.example.com"),
        primary_spki(),
        &secondary,
    )
    .expect("hybrid builder")
}

/// A certificate issued through the base (single signature) pipeline.
pub fn plain_certificate(extensions: Vec<Extension>) -> Certificate {
    let mut builder = CertificateBuilder::new(
        name("CN=Plain CA"),
        SerialNumber::new(&[0x07]).expect("serial"),
        validity(),
        name("CN=plain.example.com"),
        primary_spki(),
    );
    for ext in extensions {
        builder
            .add_extension(ext.extn_id, ext.critical, ext.extn_value.into_bytes())
            .expect("extension");
    }
    builder
        .build(&DigestPrimarySigner::default())
        .expect("plain certificate")
}

/// A CSR with the given attributes and a dummy signature.
pub fn signing_request(attributes: Attributes) -> CertReq {
    CertReq {
        info: CertReqInfo {
            version: x509_cert::request::Version::V1,
            subject: name("CN=requester.example.com"),
            public_key: primary_spki(),
            attributes,
        },
        algorithm: AlgorithmIdentifierOwned {
            oid: ObjectIdentifier::new_unwrap(ECDSA_WITH_SHA256),
            parameters: None,
        },
        signature: BitString::from_bytes(&[0x30, 0x00]).expect("bit string"),
    }
}

/// Wrap `content` in a DER SEQUENCE header.
pub fn wrap_sequence(content: &[u8]) -> Vec<u8> {
    let mut out = vec![0x30];
    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else if len <= 0xFF {
        out.extend_from_slice(&[0x81, len as u8]);
    } else {
        out.extend_from_slice(&[0x82, (len >> 8) as u8, len as u8]);
    }
    out.extend_from_slice(content);
    out
}
