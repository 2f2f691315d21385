//! GitHub `X-Hub-Signature-256` verification for inbound webhook payloads.
//!
//! Verification fails closed: a missing secret or header is a rejection, never
//! a skipped check. Digests are compared with [`Mac::verify_slice`], which runs
//! in constant time with respect to the position of the first differing byte.
use anyhow::{anyhow, bail, Context, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

pub const GITHUB_SIGNATURE_HEADER: &str = "x-hub-signature-256";
pub const GITHUB_SIGNATURE_PREFIX: &str = "sha256=";

const SHA256_DIGEST_HEX_LEN: usize = 64;

/// Returns true only when `signature_header` is the HMAC-SHA256 of `payload` under `secret`.
///
/// Every rejection emits a warning that names the failure class; neither the
/// secret nor any digest is logged.
pub fn verify_webhook_signature(
    secret: Option<&[u8]>,
    payload: &[u8],
    signature_header: Option<&str>,
) -> bool {
    let Some(secret) = secret.filter(|secret| !secret.is_empty()) else {
        tracing::warn!("webhook rejected: signing secret is not configured");
        return false;
    };
    let Some(signature_header) = signature_header else {
        tracing::warn!("webhook rejected: signature header is missing");
        return false;
    };

    match verify_github_sha256_signature(payload, signature_header, secret) {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(reason = %error, "webhook rejected: invalid signature");
            false
        }
    }
}

/// Formats the `sha256=<lowercase hex>` header GitHub sends for `payload`.
pub fn github_sha256_signature(secret: &[u8], payload: &[u8]) -> Result<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret)
        .context("failed to initialize webhook HMAC signer")?;
    mac.update(payload);
    let digest = mac.finalize().into_bytes();
    Ok(format!(
        "{GITHUB_SIGNATURE_PREFIX}{}",
        digest
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>()
    ))
}

fn verify_github_sha256_signature(payload: &[u8], signature: &str, secret: &[u8]) -> Result<()> {
    let Some(digest_hex) = signature.strip_prefix(GITHUB_SIGNATURE_PREFIX) else {
        bail!("github webhook signature must use sha256=<hex> format");
    };
    let signature_bytes = decode_lowercase_hex(digest_hex)?;
    let mut mac = Hmac::<Sha256>::new_from_slice(secret)
        .context("failed to initialize webhook HMAC verifier")?;
    mac.update(payload);
    mac.verify_slice(&signature_bytes)
        .map_err(|_| anyhow!("webhook signature verification failed"))
}

// Only the exact lowercase rendering is accepted, so decoding never maps two
// distinct header strings onto the same digest.
fn decode_lowercase_hex(value: &str) -> Result<Vec<u8>> {
    if value.len() != SHA256_DIGEST_HEX_LEN {
        bail!("signature digest must have exactly {SHA256_DIGEST_HEX_LEN} hex characters");
    }

    let mut bytes = Vec::with_capacity(value.len() / 2);
    for pair in value.as_bytes().chunks_exact(2) {
        let high = lowercase_hex_value(pair[0])?;
        let low = lowercase_hex_value(pair[1])?;
        bytes.push((high << 4) | low);
    }
    Ok(bytes)
}

fn lowercase_hex_value(raw: u8) -> Result<u8> {
    match raw {
        b'0'..=b'9' => Ok(raw - b'0'),
        b'a'..=b'f' => Ok(raw - b'a' + 10),
        _ => bail!("signature digest must be lowercase hex"),
    }
}
