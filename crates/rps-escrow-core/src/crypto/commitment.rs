//! Secret and CommitmentHash for the commit-reveal scheme.

use super::hex_bytes;
use crate::games::Move;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Secret chosen by a player when committing to a move
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(#[serde(with = "hex_bytes")] [u8; 32]);

impl Secret {
    /// Create a new random secret
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for Secret {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(hex_bytes::parse(s)?))
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// CommitmentHash = SHA256(move_code || secret)
///
/// The same value identifies the game record it was registered under, so a
/// commitment can only ever back one record.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitmentHash(#[serde(with = "hex_bytes")] [u8; 32]);

impl CommitmentHash {
    /// Commit to a move blinded by a secret
    pub fn new(mv: Move, secret: &Secret) -> Self {
        let mut hasher = Sha256::new();
        hasher.update([mv.code()]);
        hasher.update(secret.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify that the given move and secret produce this commitment
    pub fn verify(&self, mv: Move, secret: &Secret) -> bool {
        *self == Self::new(mv, secret)
    }
}

impl FromStr for CommitmentHash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(hex_bytes::parse(s)?))
    }
}

impl fmt::Debug for CommitmentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitmentHash({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for CommitmentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_A: [u8; 32] = [0x11; 32];
    const SECRET_B: [u8; 32] = [0x22; 32];

    #[test]
    fn test_commitment_is_deterministic() {
        let secret = Secret::from_bytes(SECRET_A);
        assert_eq!(
            CommitmentHash::new(Move::Rock, &secret),
            CommitmentHash::new(Move::Rock, &secret)
        );
    }

    #[test]
    fn test_commitment_fixed_vectors() {
        // SHA256(0x01 || 0x11 * 32)
        let rock = CommitmentHash::new(Move::Rock, &Secret::from_bytes(SECRET_A));
        assert_eq!(
            rock.to_string(),
            "c2ad0a997751e04066912fa490a9976d6135d221c0df197dfb8c8a7a7e04da0e"
        );

        // SHA256(0x02 || 0x22 * 32)
        let paper = CommitmentHash::new(Move::Paper, &Secret::from_bytes(SECRET_B));
        assert_eq!(
            paper.to_string(),
            "45dbfe0dd7b69ba886b9c865f2ccfe6c9966885853fd230b9dd01d2e37404fba"
        );
    }

    #[test]
    fn test_commitment_verification() {
        let secret = Secret::random();
        let commitment = CommitmentHash::new(Move::Paper, &secret);

        assert!(commitment.verify(Move::Paper, &secret));
    }

    #[test]
    fn test_different_moves_different_commitments() {
        let secret = Secret::from_bytes(SECRET_A);
        let rock = CommitmentHash::new(Move::Rock, &secret);
        let paper = CommitmentHash::new(Move::Paper, &secret);
        let scissors = CommitmentHash::new(Move::Scissors, &secret);

        assert_ne!(rock, paper);
        assert_ne!(paper, scissors);
        assert_ne!(rock, scissors);
    }

    #[test]
    fn test_different_secrets_different_commitments() {
        let a = CommitmentHash::new(Move::Rock, &Secret::from_bytes(SECRET_A));
        let b = CommitmentHash::new(Move::Rock, &Secret::from_bytes(SECRET_B));

        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_move_fails_verification() {
        let secret = Secret::from_bytes(SECRET_B);
        let commitment = CommitmentHash::new(Move::Paper, &secret);

        assert!(!commitment.verify(Move::Scissors, &secret));
    }

    #[test]
    fn test_wrong_secret_fails_verification() {
        let commitment = CommitmentHash::new(Move::Rock, &Secret::from_bytes(SECRET_A));

        assert!(!commitment.verify(Move::Rock, &Secret::from_bytes(SECRET_B)));
    }

    #[test]
    fn test_hex_parse_and_display() {
        let commitment = CommitmentHash::new(Move::Scissors, &Secret::from_bytes(SECRET_A));
        let text = commitment.to_string();
        assert_eq!(text.len(), 64);

        let parsed: CommitmentHash = text.parse().unwrap();
        assert_eq!(parsed, commitment);

        let prefixed: CommitmentHash = format!("0x{}", text).parse().unwrap();
        assert_eq!(prefixed, commitment);

        assert!("abcd".parse::<CommitmentHash>().is_err());
        assert!("zz".repeat(32).parse::<CommitmentHash>().is_err());
    }

    #[test]
    fn test_json_is_hex_string() {
        let secret = Secret::from_bytes(SECRET_B);
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, format!("\"{}\"", "22".repeat(32)));
    }
}
