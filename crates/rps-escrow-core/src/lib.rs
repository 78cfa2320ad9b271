//! RPS Escrow Core Library
//!
//! Escrow-mediated Rock-Paper-Scissors between two parties. Players commit
//! to `SHA256(move || secret)` together with a stake, reveal once both
//! stakes are in, and pull their payout afterwards. Unresolved stakes can be
//! taken back once their deadline has passed.

pub mod config;
pub mod crypto;
pub mod error;
pub mod escrow;
pub mod games;
pub mod ledger;

pub use config::{ConfigError, EscrowConfig};
pub use crypto::{CommitmentHash, Secret};
pub use error::EscrowError;
pub use escrow::{
    Call, ChallengeCreated, ChallengeInfo, Claimed, Escrow, EscrowEvent, GameRecord, Reclaimed,
    RecordStatus, RevealAccepted, RevealReceipt, RewardsComputed, Role,
};
pub use games::{compute_rewards, Move, Outcome, Rewards};
pub use ledger::{AccountId, InMemoryLedger, Ledger, LedgerError};
