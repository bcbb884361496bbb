//! PEM/DER codec for X25519 keys (RFC 8410).
//!
//! Private keys are PKCS#8 `PRIVATE KEY` blocks and public keys are
//! SubjectPublicKeyInfo `PUBLIC KEY` blocks, byte-for-byte what
//! `openssl genpkey -algorithm X25519` and `openssl pkey -pubout` emit.

use keygen_core::ProviderError;
use pem::{EncodeConfig, LineEnding, Pem};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
pub const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";

const KEY_LEN: usize = 32;

// SEQUENCE { INTEGER 0, SEQUENCE { OID 1.3.101.110 }, OCTET STRING { OCTET STRING (32) } }
const PKCS8_PREFIX: [u8; 16] = [
    0x30, 0x2e, // SEQUENCE (46 bytes)
    0x02, 0x01, 0x00, // INTEGER 0 (version)
    0x30, 0x05, // SEQUENCE (algorithm identifier)
    0x06, 0x03, 0x2b, 0x65, 0x6e, // OID 1.3.101.110 (X25519)
    0x04, 0x22, // OCTET STRING (34 bytes)
    0x04, 0x20, // OCTET STRING (32 bytes) - the private key
];

// SEQUENCE { SEQUENCE { OID 1.3.101.110 }, BIT STRING (32 bytes, 0 unused bits) }
const SPKI_PREFIX: [u8; 12] = [
    0x30, 0x2a, // SEQUENCE (42 bytes)
    0x30, 0x05, // SEQUENCE (algorithm identifier)
    0x06, 0x03, 0x2b, 0x65, 0x6e, // OID 1.3.101.110 (X25519)
    0x03, 0x21, 0x00, // BIT STRING (33 bytes, no unused bits)
];

fn encode_config() -> EncodeConfig {
    EncodeConfig::new().set_line_ending(LineEnding::LF)
}

/// Encode a private key as a PKCS#8 PEM block.
pub fn encode_private_key(secret: &StaticSecret) -> Zeroizing<String> {
    let key = Zeroizing::new(secret.to_bytes());
    let mut der = Zeroizing::new(Vec::with_capacity(PKCS8_PREFIX.len() + KEY_LEN));
    der.extend_from_slice(&PKCS8_PREFIX);
    der.extend_from_slice(&key[..]);

    let block = Pem::new(PRIVATE_KEY_LABEL, std::mem::take(&mut *der));
    let text = Zeroizing::new(pem::encode_config(&block, encode_config()));
    drop(Zeroizing::new(block.into_contents()));
    text
}

/// Encode a public key as a SubjectPublicKeyInfo PEM block.
pub fn encode_public_key(public: &PublicKey) -> String {
    let mut der = Vec::with_capacity(SPKI_PREFIX.len() + KEY_LEN);
    der.extend_from_slice(&SPKI_PREFIX);
    der.extend_from_slice(public.as_bytes());

    pem::encode_config(&Pem::new(PUBLIC_KEY_LABEL, der), encode_config())
}

/// Decode a PKCS#8 PEM private key.
pub fn decode_private_key(input: &[u8]) -> Result<StaticSecret, ProviderError> {
    let der = Zeroizing::new(parse_block(input, PRIVATE_KEY_LABEL)?.into_contents());
    let key = strip_prefix(&der, &PKCS8_PREFIX, "PKCS#8")?;
    Ok(StaticSecret::from(*key))
}

/// Decode a SubjectPublicKeyInfo PEM public key.
pub fn decode_public_key(input: &[u8]) -> Result<PublicKey, ProviderError> {
    let block = parse_block(input, PUBLIC_KEY_LABEL)?;
    let key = strip_prefix(block.contents(), &SPKI_PREFIX, "SubjectPublicKeyInfo")?;
    Ok(PublicKey::from(*key))
}

/// Re-derive the public key PEM for a private key PEM.
pub fn derive_public_pem(private_pem: &[u8]) -> Result<String, ProviderError> {
    let secret = decode_private_key(private_pem)?;
    Ok(encode_public_key(&PublicKey::from(&secret)))
}

fn parse_block(input: &[u8], label: &str) -> Result<Pem, ProviderError> {
    let block = pem::parse(input).map_err(|e| ProviderError::Decode(format!("invalid PEM: {e}")))?;
    if block.tag() != label {
        return Err(ProviderError::Decode(format!(
            "expected {label} block, found {}",
            block.tag()
        )));
    }
    Ok(block)
}

fn strip_prefix<'a>(
    der: &'a [u8],
    prefix: &[u8],
    kind: &str,
) -> Result<&'a [u8; KEY_LEN], ProviderError> {
    let key = der
        .strip_prefix(prefix)
        .ok_or_else(|| ProviderError::Decode(format!("not an X25519 {kind} structure")))?;
    key.try_into().map_err(|_| {
        ProviderError::Decode(format!(
            "expected {KEY_LEN} key bytes, got {}",
            key.len()
        ))
    })
}
