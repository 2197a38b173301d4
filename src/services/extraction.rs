//! Extraction of the hybrid signature from issued certificates and from CSRs.
//!
//! Both entry points locate the extension and then share
//! `HybridSignature::from_extension` for the inner decode.

use der::asn1::SetOfVec;
use der::{Any, Decode, DecodePem, Encode};
use x509_cert::attr::Attribute;
use x509_cert::ext::{Extension, Extensions};
use x509_cert::request::CertReq;
use x509_cert::Certificate;

use crate::domain::constants::{HYBRID_SIGNATURE_OID, PKCS9_EXTENSION_REQUEST_OID};
use crate::domain::hybrid::HybridSignature;
use crate::infra::error::{HybridError, HybridResult};

fn find_hybrid_signature(extensions: &[Extension]) -> Option<&Extension> {
    extensions
        .iter()
        .find(|ext| ext.extn_id == HYBRID_SIGNATURE_OID)
}

/// Extract the hybrid signature from an issued certificate.
///
/// Fails with `ExtensionNotFound` when the certificate has no 2.5.29.212
/// extension and with `MalformedExtension` when its value does not decode.
pub fn from_certificate(certificate: &Certificate) -> HybridResult<HybridSignature> {
    let extensions = certificate
        .tbs_certificate
        .extensions
        .as_deref()
        .unwrap_or_default();
    let extension = find_hybrid_signature(extensions)
        .ok_or_else(|| HybridError::ExtensionNotFound(HYBRID_SIGNATURE_OID.to_string()))?;
    let signature = HybridSignature::from_extension(extension)?;
    log::debug!("Extracted hybrid signature from certificate: {signature:?}");
    Ok(signature)
}

/// Parse a DER certificate and extract its hybrid signature.
pub fn from_certificate_der(der: &[u8]) -> HybridResult<HybridSignature> {
    let certificate = Certificate::from_der(der)?;
    from_certificate(&certificate)
}

/// Extract the hybrid signature from a PKCS#10 request.
///
/// - no extensionRequest attribute: `Ok(None)`
/// - attribute present, hybrid signature missing: `RequestExtensionNotFound`
/// - attribute present but not a list of extensions: `MalformedExtension`
pub fn from_signing_request(request: &CertReq) -> HybridResult<Option<HybridSignature>> {
    let Some(attribute) = request
        .info
        .attributes
        .iter()
        .find(|attr| attr.oid == PKCS9_EXTENSION_REQUEST_OID)
    else {
        log::debug!("CSR carries no extension request attribute");
        return Ok(None);
    };

    let value = attribute.values.iter().next().ok_or_else(|| {
        HybridError::MalformedExtension("Extension request attribute has no values".to_string())
    })?;
    let extensions = decode_extension_request(value)?;

    let extension = find_hybrid_signature(&extensions).ok_or_else(|| {
        HybridError::RequestExtensionNotFound(format!(
            "{HYBRID_SIGNATURE_OID} absent from {} requested extension(s)",
            extensions.len()
        ))
    })?;
    let signature = HybridSignature::from_extension(extension)?;
    log::debug!("Extracted hybrid signature from CSR: {signature:?}");
    Ok(Some(signature))
}

/// Parse a DER CSR and extract its hybrid signature.
pub fn from_signing_request_der(der: &[u8]) -> HybridResult<Option<HybridSignature>> {
    let request = CertReq::from_der(der)?;
    from_signing_request(&request)
}

/// Parse a PEM CSR and extract its hybrid signature.
pub fn from_signing_request_pem(pem: &[u8]) -> HybridResult<Option<HybridSignature>> {
    let request = CertReq::from_pem(pem)?;
    from_signing_request(&request)
}

fn decode_extension_request(value: &Any) -> HybridResult<Extensions> {
    let der = value.to_der()?;
    Extensions::from_der(&der).map_err(|e| {
        HybridError::MalformedExtension(format!(
            "Extension request value is not a SEQUENCE OF Extension: {e}"
        ))
    })
}

/// Build the PKCS#9 extensionRequest attribute carrying `extensions`.
pub fn extension_request_attribute(extensions: Extensions) -> HybridResult<Attribute> {
    let value = Any::encode_from(&extensions)?;
    Ok(Attribute {
        oid: PKCS9_EXTENSION_REQUEST_OID,
        values: SetOfVec::try_from(vec![value])?,
    })
}
