//! Cryptographic primitives for the commit-reveal scheme.
//!
//! This module provides:
//! - Secret for blinding a committed move
//! - CommitmentHash, which doubles as the registry key of a game record

mod commitment;

pub use commitment::{CommitmentHash, Secret};

/// Hex (de)serialization for fixed 32-byte values.
pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let hex_str = String::deserialize(d)?;
        parse(&hex_str).map_err(serde::de::Error::custom)
    }

    /// Parse 64 hex characters, with or without a `0x` prefix.
    pub fn parse(s: &str) -> Result<[u8; 32], hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut arr = [0u8; 32];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(arr)
    }
}
