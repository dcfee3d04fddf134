//! Salted AES-256-CBC payloads as produced by CookieCloud clients.
//!
//! Blob layout (before base64): `"Salted__"` ‖ 8-byte salt ‖ ciphertext.
//! Key and IV come from the legacy `EVP_BytesToKey` scheme with MD5 and a
//! single iteration: `D_i = MD5(D_{i-1} ‖ password ‖ salt)`, concatenated
//! until 48 bytes are available (32-byte key, 16-byte IV).

use aes::Aes256;
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use md5::{Digest, Md5};
use rand::Rng;

use crate::error::{CookieCloudError, Result};

/// Header of every salted blob.
const SALT_MAGIC: &[u8; 8] = b"Salted__";
const SALT_LEN: usize = 8;
const BLOCK_LEN: usize = 16;

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;

/// Derive the 32-byte key and 16-byte IV for `password` and `salt`.
pub fn derive_key_iv(password: &[u8], salt: &[u8]) -> ([u8; 32], [u8; 16]) {
    let mut derived = Vec::with_capacity(64);
    let mut prev: Vec<u8> = Vec::new();
    while derived.len() < 48 {
        let mut hasher = Md5::new();
        hasher.update(&prev);
        hasher.update(password);
        hasher.update(salt);
        prev = hasher.finalize().to_vec();
        derived.extend_from_slice(&prev);
    }

    let mut key = [0u8; 32];
    let mut iv = [0u8; 16];
    key.copy_from_slice(&derived[..32]);
    iv.copy_from_slice(&derived[32..48]);
    (key, iv)
}

/// Password CookieCloud uses for a given UUID: the first 16 hex characters of
/// `MD5(uuid + "-" + password)`.
pub fn derive_password(uuid: &str, password: &str) -> String {
    let digest = Md5::digest(format!("{uuid}-{password}").as_bytes());
    let hex = format!("{digest:x}");
    hex[..16].to_owned()
}

/// Decrypt a base64 salted blob and return the UTF-8 plaintext.
pub fn decrypt(password: &str, encoded: &str) -> Result<String> {
    let blob = B64
        .decode(encoded.trim())
        .map_err(|e| CookieCloudError::Format(format!("invalid base64: {e}")))?;
    if blob.len() < SALT_MAGIC.len() + SALT_LEN {
        return Err(CookieCloudError::Format(format!(
            "payload too short ({} bytes)",
            blob.len()
        )));
    }
    if &blob[..8] != SALT_MAGIC {
        return Err(CookieCloudError::Format("missing \"Salted__\" header".into()));
    }

    let salt = &blob[8..16];
    let mut buf = blob[16..].to_vec();
    if buf.is_empty() || buf.len() % BLOCK_LEN != 0 {
        return Err(CookieCloudError::Format(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
            buf.len()
        )));
    }

    let (key, iv) = derive_key_iv(password.as_bytes(), salt);
    let plain_len = Aes256CbcDec::new((&key).into(), (&iv).into())
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|e| CookieCloudError::Format(e.to_string()))?
        .len();
    buf.truncate(plain_len);

    // PKCS#7 is stripped by hand: the last byte is the pad length.
    let pad = usize::from(buf[buf.len() - 1]);
    if pad == 0 || pad > BLOCK_LEN || pad > buf.len() {
        return Err(CookieCloudError::Format(format!("invalid padding length {pad}")));
    }
    buf.truncate(buf.len() - pad);

    String::from_utf8(buf).map_err(|e| CookieCloudError::Format(e.to_string()))
}

/// Encrypt `plaintext` with a random salt, producing a blob [`decrypt`] accepts.
pub fn encrypt(password: &str, plaintext: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill(&mut salt);
    encrypt_with_salt(password, &salt, plaintext)
}

/// Deterministic variant of [`encrypt`].
pub fn encrypt_with_salt(password: &str, salt: &[u8; SALT_LEN], plaintext: &str) -> String {
    let (key, iv) = derive_key_iv(password.as_bytes(), salt);
    let data = plaintext.as_bytes();
    let pad_len = BLOCK_LEN - (data.len() % BLOCK_LEN);
    let mut buf = vec![0u8; data.len() + pad_len];
    buf[..data.len()].copy_from_slice(data);
    let ct = Aes256CbcEnc::new((&key).into(), (&iv).into())
        .encrypt_padded_mut::<Pkcs7>(&mut buf, data.len())
        .expect("buffer is correctly sized");

    let mut blob = Vec::with_capacity(SALT_MAGIC.len() + SALT_LEN + ct.len());
    blob.extend_from_slice(SALT_MAGIC);
    blob.extend_from_slice(salt);
    blob.extend_from_slice(ct);
    B64.encode(blob)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Vectors produced with `openssl enc -aes-256-cbc -md md5 -S 0102030405060708`.
    const SALT: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];
    const HELLO_BLOB: &str = "U2FsdGVkX18BAgMEBQYHCOjVGFUrwqXG2sjgYrdk3wh4sgCjvzOTRr03jWXUfJHJ";
    const FULL_BLOCK_BLOB: &str = "U2FsdGVkX18BAgMEBQYHCAr2qmhF/aZ9wLI3xmrlvCCJaaQOfimHZuxx/QJxJpS6";

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02X}")).collect()
    }

    #[test]
    fn test_derive_key_iv_matches_openssl() {
        let (key, iv) = derive_key_iv(b"password", &SALT);
        assert_eq!(
            hex(&key),
            "E7B0971E52CA5CC8D0539FB3412F6316F7BA2E6EE293D9F3457B99436B51CE02"
        );
        assert_eq!(hex(&iv), "8D450E2ED75A84A923D4EAC9FE49226B");
    }

    #[test]
    fn test_derive_password() {
        assert_eq!(derive_password("test-uuid", "secret"), "6a812de935e667f7");
    }

    #[test]
    fn test_decrypt_known_vector() {
        assert_eq!(decrypt("password", HELLO_BLOB).unwrap(), "hello cookiecloud");
    }

    #[test]
    fn test_decrypt_full_padding_block() {
        assert_eq!(decrypt("password", FULL_BLOCK_BLOB).unwrap(), "0123456789abcdef");
    }

    #[test]
    fn test_encrypt_with_salt_matches_openssl() {
        assert_eq!(encrypt_with_salt("password", &SALT, "hello cookiecloud"), HELLO_BLOB);
    }

    #[test]
    fn test_random_salt_roundtrip() {
        let text = r#"{"cookie_data":{},"update_time":"2024-01-01"}"#;
        let blob = encrypt("another password", text);
        assert_eq!(decrypt("another password", &blob).unwrap(), text);
    }

    #[test]
    fn test_short_blob_is_format_error() {
        let blob = B64.encode(b"Salted__1234");
        assert!(matches!(decrypt("password", &blob), Err(CookieCloudError::Format(_))));
    }

    #[test]
    fn test_missing_marker_is_format_error() {
        let blob = B64.encode(b"NotSalt_12345678abcdefghabcdefgh");
        assert!(matches!(decrypt("password", &blob), Err(CookieCloudError::Format(_))));
    }

    #[test]
    fn test_unaligned_ciphertext_is_format_error() {
        let blob = B64.encode(b"Salted__12345678abc");
        assert!(matches!(decrypt("password", &blob), Err(CookieCloudError::Format(_))));
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(
            decrypt("password", "%%%"),
            Err(CookieCloudError::Format(ref msg)) if msg.starts_with("invalid base64")
        ));
    }
}
