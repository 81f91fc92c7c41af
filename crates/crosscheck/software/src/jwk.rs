//! Minimal JSON Web Key documents for the encodings this provider exports.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct OctJwk {
    kty: String,
    k: String,
}

#[derive(Serialize, Deserialize)]
struct OkpJwk {
    kty: String,
    crv: String,
    d: String,
    x: String,
}

pub(crate) fn oct_jwk(key: &[u8]) -> Result<Vec<u8>, String> {
    let document = OctJwk {
        kty: "oct".to_string(),
        k: URL_SAFE_NO_PAD.encode(key),
    };
    serde_json::to_vec(&document).map_err(|e| e.to_string())
}

pub(crate) fn parse_oct_jwk(bytes: &[u8]) -> Result<Vec<u8>, String> {
    let document: OctJwk = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    if document.kty != "oct" {
        return Err(format!("expected kty 'oct', found '{}'", document.kty));
    }
    URL_SAFE_NO_PAD.decode(document.k).map_err(|e| e.to_string())
}

pub(crate) fn okp_jwk(seed: &[u8], public: &[u8]) -> Result<Vec<u8>, String> {
    let document = OkpJwk {
        kty: "OKP".to_string(),
        crv: "Ed25519".to_string(),
        d: URL_SAFE_NO_PAD.encode(seed),
        x: URL_SAFE_NO_PAD.encode(public),
    };
    serde_json::to_vec(&document).map_err(|e| e.to_string())
}

pub(crate) fn parse_okp_jwk(bytes: &[u8]) -> Result<Vec<u8>, String> {
    let document: OkpJwk = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    if document.kty != "OKP" || document.crv != "Ed25519" {
        return Err(format!(
            "expected OKP/Ed25519, found {}/{}",
            document.kty, document.crv
        ));
    }
    URL_SAFE_NO_PAD.decode(document.d).map_err(|e| e.to_string())
}
