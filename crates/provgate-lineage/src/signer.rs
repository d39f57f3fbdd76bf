//! HMAC-SHA256 signer for lineage records.
//!
//! A symmetric scheme: the same secret creates and verifies signatures.  The
//! key is handed over as raw bytes at construction and never logged.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded HMAC-SHA256 tag.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Signs and verifies byte payloads with a process-held secret.
#[derive(Clone)]
pub struct HmacSigner {
    mac: HmacSha256,
}

impl HmacSigner {
    /// Build a signer from raw key bytes.  Any key length is accepted,
    /// including empty.
    ///
    /// # Panics
    ///
    /// Never in practice: HMAC hashes or pads keys of any length, so
    /// `new_from_slice` cannot reject one.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mac = HmacSha256::new_from_slice(secret.as_ref())
            .expect("HMAC accepts any key size");
        Self { mac }
    }

    /// Lowercase hex HMAC-SHA256 of `payload`.
    pub fn sign(&self, payload: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Check `signature` against `payload` in constant time.
    ///
    /// Only the exact form produced by [`HmacSigner::sign`] is accepted: 64
    /// lowercase hex characters.  Anything else returns `false`.
    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        if signature.len() != SIGNATURE_HEX_LEN
            || !signature.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return false;
        }
        let Ok(tag) = hex::decode(signature) else {
            return false;
        };

        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.verify_slice(&tag).is_ok()
    }
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HmacSigner { .. }")
    }
}
