//! Hybrid certificate builder.
//!
//! Composes the base `CertificateBuilder` with `HybridKeyHook`, which embeds
//! the secondary public key before the TBS is frozen. The only valid output is
//! a doubly signed certificate:
//!
//! 1. hybrid key extension inserted (non-critical)
//! 2. secondary signer signs the DER of the prepared TBS
//! 3. hybrid signature extension appended
//! 4. primary signer signs the final TBS

use std::fmt;

use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::Validity;
use x509_cert::{Certificate, TbsCertificate};

use crate::domain::hybrid::{HybridKey, HybridSignature, SecondaryPublicKey};
use crate::domain::registry::SecurityCategory;
use crate::infra::error::{HybridError, HybridResult};
use crate::services::signer::{PrimarySigner, SecondarySigner};
use crate::services::tbs_builder::{
    insert_extension, CertificateBuilder, PreSigningHook, PreparedTbs,
};

/// Inserts the hybrid key extension into the TBS.
#[derive(Clone, Debug)]
pub struct HybridKeyHook {
    key: HybridKey,
}

impl HybridKeyHook {
    #[must_use]
    pub fn new(key: HybridKey) -> Self {
        Self { key }
    }

    #[must_use]
    pub fn key(&self) -> &HybridKey {
        &self.key
    }
}

impl PreSigningHook for HybridKeyHook {
    fn name(&self) -> &'static str {
        "hybrid-key"
    }

    fn before_signing(&self, tbs: &mut TbsCertificate) -> HybridResult<()> {
        let extension = self
            .key
            .to_extension(false)
            .map_err(|e| HybridError::ExtensionInsertionFailure(e.to_string()))?;
        insert_extension(tbs, extension)
    }
}

/// Builder for certificates carrying a secondary public key and signature.
pub struct HybridCertificateBuilder {
    base: CertificateBuilder,
    hook: HybridKeyHook,
}

impl HybridCertificateBuilder {
    /// Create a builder for a hybrid version 3 certificate.
    ///
    /// # Arguments
    ///
    /// * `issuer` - the certificate issuer
    /// * `serial_number` - the certificate serial number
    /// * `validity` - the notBefore/notAfter window
    /// * `subject` - the certificate subject
    /// * `primary` - the public key associated with this certificate
    /// * `secondary` - the second (hybrid) public key
    pub fn new(
        issuer: Name,
        serial_number: SerialNumber,
        validity: Validity,
        subject: Name,
        primary: SubjectPublicKeyInfoOwned,
        secondary: &dyn SecondaryPublicKey,
    ) -> HybridResult<Self> {
        let key = HybridKey::from_public_key(secondary)?;
        Ok(Self {
            base: CertificateBuilder::new(issuer, serial_number, validity, subject, primary),
            hook: HybridKeyHook::new(key),
        })
    }

    /// Create a builder whose issuer is the subject of `issuer_certificate`.
    pub fn from_issuer_certificate(
        issuer_certificate: &Certificate,
        serial_number: SerialNumber,
        validity: Validity,
        subject: Name,
        primary: SubjectPublicKeyInfoOwned,
        secondary: &dyn SecondaryPublicKey,
    ) -> HybridResult<Self> {
        Self::new(
            issuer_certificate.tbs_certificate.subject.clone(),
            serial_number,
            validity,
            subject,
            primary,
            secondary,
        )
    }

    /// Access the base builder to add non-hybrid extensions.
    pub fn base_mut(&mut self) -> &mut CertificateBuilder {
        &mut self.base
    }

    #[must_use]
    pub fn secondary_key(&self) -> &HybridKey {
        self.hook.key()
    }

    /// Insert the hybrid key extension and freeze the TBS for two-phase signing.
    ///
    /// Consumes the builder, so it runs exactly once and strictly before any
    /// signer sees the TBS.
    pub fn prepare_for_hybrid(
        self,
        primary: &dyn PrimarySigner,
        secondary_signature_size: usize,
        secondary_algorithm: AlgorithmIdentifierOwned,
    ) -> HybridResult<HybridPreparedTbs> {
        if secondary_signature_size == 0 {
            return Err(HybridError::InvalidInput(
                "Secondary signature size must be greater than 0".to_string(),
            ));
        }
        if let Some(category) = SecurityCategory::from_algorithm_identifier(&secondary_algorithm) {
            if category.signature_size() != secondary_signature_size {
                return Err(HybridError::InvalidInput(format!(
                    "{category} signatures are {} bytes, declared {secondary_signature_size}",
                    category.signature_size()
                )));
            }
        }

        let Self { mut base, hook } = self;
        base.add_hook(Box::new(hook));
        let prepared = base.prepare(primary.algorithm_identifier())?;
        log::debug!(
            "Prepared hybrid TBS: secondary algorithm {}, {secondary_signature_size} byte signature",
            secondary_algorithm.oid
        );
        Ok(HybridPreparedTbs {
            prepared,
            secondary_signature_size,
            secondary_algorithm,
        })
    }

    /// Single-signature finalization is not available on a hybrid builder.
    pub fn build(self, _primary: &dyn PrimarySigner) -> HybridResult<Certificate> {
        Err(HybridError::UnsupportedOperation(
            "A hybrid builder only produces doubly signed certificates; use build_hybrid"
                .to_string(),
        ))
    }

    /// Two-signature finalization: secondary signature first, primary last.
    pub fn build_hybrid(
        self,
        primary: &dyn PrimarySigner,
        secondary: &dyn SecondarySigner,
    ) -> HybridResult<Certificate> {
        let prepared = self.prepare_for_hybrid(
            primary,
            secondary.signature_size(),
            secondary.algorithm_identifier(),
        )?;
        prepared.sign(primary, secondary)
    }
}

impl fmt::Debug for HybridCertificateBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HybridCertificateBuilder(base={:?}, secondary={})",
            self.base,
            self.hook.key().subject_public_key_info().algorithm.oid
        )
    }
}

/// Prepared TBS together with the declared secondary signature parameters.
#[derive(Clone, Debug)]
pub struct HybridPreparedTbs {
    prepared: PreparedTbs,
    secondary_signature_size: usize,
    secondary_algorithm: AlgorithmIdentifierOwned,
}

impl HybridPreparedTbs {
    #[must_use]
    pub fn tbs(&self) -> &TbsCertificate {
        self.prepared.tbs()
    }

    #[must_use]
    pub fn secondary_signature_size(&self) -> usize {
        self.secondary_signature_size
    }

    #[must_use]
    pub fn secondary_algorithm(&self) -> &AlgorithmIdentifierOwned {
        &self.secondary_algorithm
    }

    /// Bytes the secondary signer signs: the DER of the prepared TBS.
    pub fn secondary_signed_content(&self) -> HybridResult<Vec<u8>> {
        self.prepared.to_der()
    }

    pub fn sign(
        self,
        primary: &dyn PrimarySigner,
        secondary: &dyn SecondarySigner,
    ) -> HybridResult<Certificate> {
        if secondary.algorithm_identifier() != self.secondary_algorithm {
            return Err(HybridError::SignatureError(format!(
                "Secondary signer algorithm {} does not match declared {}",
                secondary.algorithm_identifier().oid,
                self.secondary_algorithm.oid
            )));
        }
        let content = self.secondary_signed_content()?;
        let signature = secondary.sign(&content)?;
        if signature.len() != self.secondary_signature_size {
            log::warn!(
                "Secondary signature length {} differs from declared {}",
                signature.len(),
                self.secondary_signature_size
            );
            return Err(HybridError::SignatureError(format!(
                "Secondary signature is {} bytes, expected {}",
                signature.len(),
                self.secondary_signature_size
            )));
        }
        let hybrid = HybridSignature::new(self.secondary_algorithm, signature)?;
        let extension = hybrid
            .to_extension()
            .map_err(|e| HybridError::ExtensionInsertionFailure(e.to_string()))?;
        let certificate = self.prepared.with_extension(extension)?.sign(primary)?;
        log::info!("Issued hybrid certificate ({:?})", hybrid);
        Ok(certificate)
    }
}
