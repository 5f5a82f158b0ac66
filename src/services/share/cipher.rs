//! Reversible obfuscation of share payloads.
//!
//! The text is URI-component encoded, XORed byte by byte with a fixed key
//! and base64 encoded. Anyone holding a link can recover the payload: this
//! keeps event data out of plain sight in URLs and storage, nothing more.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::ShareError;

const SHARE_KEY: &[u8] = b"calendar-share-2025";

/// Characters `encodeURIComponent` leaves as they are.
fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&byte)
}

/// Percent-encode everything except the URI-component unreserved set.
pub fn encode_uri_component(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        if is_unreserved(byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

fn xor_with_key(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .zip(SHARE_KEY.iter().cycle())
        .map(|(byte, key)| byte ^ key)
        .collect()
}

pub fn obfuscate(plain: &str) -> String {
    STANDARD.encode(xor_with_key(encode_uri_component(plain).as_bytes()))
}

pub fn reveal(token: &str) -> Result<String, ShareError> {
    let bytes = STANDARD
        .decode(token.trim())
        .map_err(|e| ShareError::Decode(e.to_string()))?;
    let encoded = String::from_utf8(xor_with_key(&bytes))
        .map_err(|e| ShareError::Decode(e.to_string()))?;
    urlencoding::decode(&encoded)
        .map(|text| text.into_owned())
        .map_err(|e| ShareError::Decode(e.to_string()))
}
