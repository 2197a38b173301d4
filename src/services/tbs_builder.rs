//! Certificate build pipeline.
//!
//! `CertificateBuilder` (unprepared, mutable) → `PreparedTbs` (frozen) →
//! `Certificate` (signed). Hooks run exactly once inside `prepare`, after
//! every caller-supplied extension and before any signer sees the TBS bytes.

use std::fmt;

use der::asn1::{BitString, ObjectIdentifier, OctetString};
use der::Encode;
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::Validity;
use x509_cert::{Certificate, TbsCertificate, Version};

use crate::infra::error::{HybridError, HybridResult};
use crate::services::signer::PrimarySigner;

/// Extension point invoked once per certificate build, before signing.
pub trait PreSigningHook {
    /// Short name for log output.
    fn name(&self) -> &'static str;

    /// Mutate the TBS structure. An error aborts the build.
    fn before_signing(&self, tbs: &mut TbsCertificate) -> HybridResult<()>;
}

/// Append `extension` to the TBS extension list; duplicates are rejected.
pub fn insert_extension(tbs: &mut TbsCertificate, extension: Extension) -> HybridResult<()> {
    let extensions = tbs.extensions.get_or_insert_with(Vec::new);
    if extensions.iter().any(|ext| ext.extn_id == extension.extn_id) {
        return Err(HybridError::ExtensionInsertionFailure(format!(
            "Extension {} already present",
            extension.extn_id
        )));
    }
    extensions.push(extension);
    Ok(())
}

/// Base (single signature) certificate builder.
pub struct CertificateBuilder {
    tbs: TbsCertificate,
    hooks: Vec<Box<dyn PreSigningHook>>,
}

impl CertificateBuilder {
    /// Create a builder for a version 3 certificate.
    pub fn new(
        issuer: Name,
        serial_number: SerialNumber,
        validity: Validity,
        subject: Name,
        subject_public_key_info: SubjectPublicKeyInfoOwned,
    ) -> Self {
        // Placeholder until `prepare` receives the primary signer's identifier.
        let signature = subject_public_key_info.algorithm.clone();
        Self {
            tbs: TbsCertificate {
                version: Version::V3,
                serial_number,
                signature,
                issuer,
                validity,
                subject,
                subject_public_key_info,
                issuer_unique_id: None,
                subject_unique_id: None,
                extensions: None,
            },
            hooks: Vec::new(),
        }
    }

    /// Add an extension from its DER-encoded value.
    pub fn add_extension(
        &mut self,
        oid: ObjectIdentifier,
        critical: bool,
        value_der: Vec<u8>,
    ) -> HybridResult<&mut Self> {
        let extn_value = OctetString::new(value_der)
            .map_err(|e| HybridError::ExtensionInsertionFailure(format!("{oid}: {e}")))?;
        insert_extension(
            &mut self.tbs,
            Extension {
                extn_id: oid,
                critical,
                extn_value,
            },
        )?;
        Ok(self)
    }

    pub fn add_hook(&mut self, hook: Box<dyn PreSigningHook>) -> &mut Self {
        self.hooks.push(hook);
        self
    }

    /// Read-only view of the TBS under construction.
    #[must_use]
    pub fn tbs(&self) -> &TbsCertificate {
        &self.tbs
    }

    /// Run hooks, stamp the primary algorithm and freeze the TBS.
    pub fn prepare(mut self, primary_algorithm: AlgorithmIdentifierOwned) -> HybridResult<PreparedTbs> {
        for hook in &self.hooks {
            log::debug!("Running pre-signing hook: {}", hook.name());
            hook.before_signing(&mut self.tbs).map_err(|e| {
                log::warn!("Pre-signing hook {} failed: {e}", hook.name());
                e
            })?;
        }
        self.tbs.signature = primary_algorithm;
        Ok(PreparedTbs { tbs: self.tbs })
    }

    /// Single-signature path: prepare, then sign with `primary`.
    pub fn build(self, primary: &dyn PrimarySigner) -> HybridResult<Certificate> {
        self.prepare(primary.algorithm_identifier())?.sign(primary)
    }
}

impl fmt::Debug for CertificateBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CertificateBuilder(extensions={}, hooks={})",
            self.tbs.extensions.as_ref().map_or(0, Vec::len),
            self.hooks.len()
        )
    }
}

/// TBS structure after all hooks ran; immutable from here on.
#[derive(Clone, Debug)]
pub struct PreparedTbs {
    tbs: TbsCertificate,
}

impl PreparedTbs {
    #[must_use]
    pub fn tbs(&self) -> &TbsCertificate {
        &self.tbs
    }

    pub fn to_der(&self) -> HybridResult<Vec<u8>> {
        Ok(self.tbs.to_der()?)
    }

    /// Append an extension as the last step before primary signing.
    pub(crate) fn with_extension(mut self, extension: Extension) -> HybridResult<Self> {
        insert_extension(&mut self.tbs, extension)?;
        Ok(self)
    }

    /// Sign the TBS with the primary signer and assemble the certificate.
    pub fn sign(self, primary: &dyn PrimarySigner) -> HybridResult<Certificate> {
        let algorithm = primary.algorithm_identifier();
        if algorithm != self.tbs.signature {
            return Err(HybridError::SignatureError(format!(
                "Primary signer algorithm {} does not match prepared TBS algorithm {}",
                algorithm.oid, self.tbs.signature.oid
            )));
        }
        let tbs_der = self.to_der()?;
        let signature = primary.sign(&tbs_der)?;
        log::debug!(
            "Primary signature: {} bytes over {} byte TBS",
            signature.len(),
            tbs_der.len()
        );
        Ok(Certificate {
            tbs_certificate: self.tbs,
            signature_algorithm: algorithm,
            signature: BitString::from_bytes(&signature)?,
        })
    }
}
