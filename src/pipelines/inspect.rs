//! `InspectWorkflow`: load a certificate or CSR file and describe its hybrid
//! signature.
//!
//! Steps:
//! 1. Read the file; PEM is detected by its `-----BEGIN` armor, anything else is DER
//! 2. Extract the hybrid signature (`services::extraction`)
//! 3. Look up the algorithm in the registry and check the signature length
//! 4. For certificates, also decode the hybrid key extension

use std::fmt;
use std::path::Path;

use der::{Decode, DecodePem};
use serde::Serialize;
use x509_cert::request::CertReq;
use x509_cert::Certificate;

use crate::domain::hybrid::{HybridKey, HybridSignature};
use crate::infra::config::HybridConfiguration;
use crate::infra::error::{HybridError, HybridResult};
use crate::services::extraction;

/// What kind of structure was inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Certificate,
    Csr,
}

/// Serializable description of the hybrid fields found in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionReport {
    pub source: SourceKind,
    /// False only for a CSR without an extension request attribute.
    pub hybrid_signature_present: bool,
    pub algorithm_oid: Option<String>,
    pub category: Option<String>,
    pub signature_len: Option<usize>,
    pub expected_signature_len: Option<usize>,
    pub length_ok: Option<bool>,
    pub hybrid_key_algorithm_oid: Option<String>,
    pub signature_prefix_hex: Option<String>,
}

impl InspectionReport {
    fn absent(source: SourceKind) -> Self {
        Self {
            source,
            hybrid_signature_present: false,
            algorithm_oid: None,
            category: None,
            signature_len: None,
            expected_signature_len: None,
            length_ok: None,
            hybrid_key_algorithm_oid: None,
            signature_prefix_hex: None,
        }
    }

    fn from_signature(
        source: SourceKind,
        signature: &HybridSignature,
        key: Option<&HybridKey>,
    ) -> Self {
        let category = signature.security_category();
        let bytes = signature.signature();
        Self {
            source,
            hybrid_signature_present: true,
            algorithm_oid: Some(signature.algorithm().oid.to_string()),
            category: category.map(|c| c.name().to_string()),
            signature_len: Some(bytes.len()),
            expected_signature_len: category.map(|c| c.signature_size()),
            length_ok: signature.has_expected_length(),
            hybrid_key_algorithm_oid: key
                .map(|k| k.subject_public_key_info().algorithm.oid.to_string()),
            signature_prefix_hex: Some(hex::encode(&bytes[..bytes.len().min(16)])),
        }
    }
}

impl fmt::Display for InspectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.source {
            SourceKind::Certificate => "certificate",
            SourceKind::Csr => "certificate signing request",
        };
        if !self.hybrid_signature_present {
            return writeln!(f, "No extension request attribute in {kind}");
        }
        writeln!(f, "Hybrid signature in {kind}")?;
        if let Some(oid) = &self.algorithm_oid {
            writeln!(f, "  Algorithm:       {oid}")?;
        }
        writeln!(
            f,
            "  Category:        {}",
            self.category.as_deref().unwrap_or("unknown")
        )?;
        if let Some(len) = self.signature_len {
            writeln!(f, "  Signature bytes: {len}")?;
        }
        if let Some(expected) = self.expected_signature_len {
            writeln!(f, "  Expected bytes:  {expected}")?;
        }
        if let Some(prefix) = &self.signature_prefix_hex {
            writeln!(f, "  Signature head:  {prefix}")?;
        }
        if let Some(oid) = &self.hybrid_key_algorithm_oid {
            writeln!(f, "  Hybrid key alg:  {oid}")?;
        }
        Ok(())
    }
}

/// Orchestrates loading and inspection of hybrid certificates and CSRs.
pub struct InspectWorkflow {
    enforce_signature_length: bool,
}

impl Default for InspectWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl InspectWorkflow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            enforce_signature_length: true,
        }
    }

    #[must_use]
    pub fn from_config(config: &HybridConfiguration) -> Self {
        Self {
            enforce_signature_length: config.enforce_signature_length,
        }
    }

    fn is_pem(data: &[u8]) -> bool {
        let trimmed = data
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .map_or(&data[..0], |start| &data[start..]);
        trimmed.starts_with(b"-----BEGIN")
    }

    /// Length policy; the extension itself already decoded.
    fn check_length(&self, report: &InspectionReport) -> HybridResult<()> {
        if self.enforce_signature_length && report.length_ok == Some(false) {
            return Err(HybridError::SignatureError(format!(
                "Hybrid signature is {} bytes, {} expects {}",
                report.signature_len.unwrap_or_default(),
                report.category.as_deref().unwrap_or("unknown"),
                report.expected_signature_len.unwrap_or_default()
            )));
        }
        Ok(())
    }

    /// Inspect certificate bytes (DER or PEM).
    pub fn inspect_certificate(&self, data: &[u8]) -> HybridResult<InspectionReport> {
        let certificate = if Self::is_pem(data) {
            Certificate::from_pem(data)?
        } else {
            Certificate::from_der(data)?
        };
        let signature = extraction::from_certificate(&certificate)?;
        let key = match HybridKey::from_certificate(&certificate) {
            Ok(key) => Some(key),
            Err(HybridError::ExtensionNotFound(oid)) => {
                log::warn!("Certificate has a hybrid signature but no hybrid key ({oid})");
                None
            }
            Err(e) => return Err(e),
        };
        let report =
            InspectionReport::from_signature(SourceKind::Certificate, &signature, key.as_ref());
        self.check_length(&report)?;
        Ok(report)
    }

    /// Inspect CSR bytes (DER or PEM).
    pub fn inspect_signing_request(&self, data: &[u8]) -> HybridResult<InspectionReport> {
        let request = if Self::is_pem(data) {
            CertReq::from_pem(data)?
        } else {
            CertReq::from_der(data)?
        };
        let report = match extraction::from_signing_request(&request)? {
            Some(signature) => {
                InspectionReport::from_signature(SourceKind::Csr, &signature, None)
            }
            None => InspectionReport::absent(SourceKind::Csr),
        };
        self.check_length(&report)?;
        Ok(report)
    }

    /// Read `path` and inspect it as a certificate or, with `csr`, as a CSR.
    pub fn run<P: AsRef<Path>>(&self, path: P, csr: bool) -> HybridResult<InspectionReport> {
        let data = std::fs::read(&path).map_err(|e| {
            HybridError::IoError(format!(
                "Failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        log::info!(
            "Inspecting {} ({} bytes)",
            path.as_ref().display(),
            data.len()
        );
        if csr {
            self.inspect_signing_request(&data)
        } else {
            self.inspect_certificate(&data)
        }
    }
}
