//! Escrow error types.

use crate::crypto::CommitmentHash;
use crate::ledger::{AccountId, LedgerError};
use thiserror::Error;

/// Reasons an escrow operation is rejected.
///
/// Every rejection is atomic: the operation leaves no state behind and any
/// value attached to the call stays with the caller.
#[derive(Debug, Error)]
pub enum EscrowError {
    #[error("Timeout {timeout}s outside allowed window [{min}s, {max}s]")]
    InvalidTimeoutWindow { timeout: u64, min: u64, max: u64 },

    #[error("Commitment already registered: {0}")]
    DuplicateOrConflictingCommitment(CommitmentHash),

    #[error("Stake must be greater than zero")]
    ZeroStake,

    #[error("Stake mismatch: expected {expected}, got {actual}")]
    StakeMismatch { expected: u64, actual: u64 },

    #[error("Cannot accept your own challenge")]
    SelfMatchForbidden,

    #[error("Account {0} is not a party to this commitment")]
    UnauthorizedParty(AccountId),

    #[error("Reveal does not match any commitment of this game")]
    CommitmentVerificationFailed,

    #[error("Move already revealed for commitment {0}")]
    AlreadyRevealed(CommitmentHash),

    #[error("Game not resolved yet")]
    GameNotYetResolved,

    #[error("No credited balance to claim")]
    ZeroCreditedBalance,

    #[error("Deadline not reached: now {now}, deadline {deadline}")]
    DeadlineNotReached { now: u64, deadline: u64 },

    #[error("Direct value transfers are not accepted")]
    DirectValueTransferForbidden,

    #[error("Unknown commitment: {0}")]
    UnknownCommitment(CommitmentHash),

    #[error("{0} is an acceptor's commitment, not a game key")]
    NotAGameKey(CommitmentHash),

    #[error("Challenge already matched")]
    AlreadyMatched,

    #[error("Challenge has no counterparty yet")]
    ChallengeNotMatched,

    #[error("Challenge expired at {deadline}")]
    ChallengeExpired { deadline: u64 },

    #[error("Challenge closed by a timeout withdrawal")]
    ChallengeClosed,

    #[error("Nothing left to reclaim")]
    NothingToReclaim,

    #[error("Invalid move code: {0}")]
    InvalidMove(u8),

    #[error("Reward overflow")]
    RewardOverflow,

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl EscrowError {
    /// Stable machine-readable name of the rejection kind
    pub fn kind(&self) -> &'static str {
        match self {
            EscrowError::InvalidTimeoutWindow { .. } => "invalid_timeout_window",
            EscrowError::DuplicateOrConflictingCommitment(_) => "duplicate_commitment",
            EscrowError::ZeroStake => "zero_stake",
            EscrowError::StakeMismatch { .. } => "stake_mismatch",
            EscrowError::SelfMatchForbidden => "self_match_forbidden",
            EscrowError::UnauthorizedParty(_) => "unauthorized_party",
            EscrowError::CommitmentVerificationFailed => "commitment_verification_failed",
            EscrowError::AlreadyRevealed(_) => "already_revealed",
            EscrowError::GameNotYetResolved => "game_not_yet_resolved",
            EscrowError::ZeroCreditedBalance => "zero_credited_balance",
            EscrowError::DeadlineNotReached { .. } => "deadline_not_reached",
            EscrowError::DirectValueTransferForbidden => "direct_value_transfer_forbidden",
            EscrowError::UnknownCommitment(_) => "unknown_commitment",
            EscrowError::NotAGameKey(_) => "not_a_game_key",
            EscrowError::AlreadyMatched => "already_matched",
            EscrowError::ChallengeNotMatched => "challenge_not_matched",
            EscrowError::ChallengeExpired { .. } => "challenge_expired",
            EscrowError::ChallengeClosed => "challenge_closed",
            EscrowError::NothingToReclaim => "nothing_to_reclaim",
            EscrowError::InvalidMove(_) => "invalid_move",
            EscrowError::RewardOverflow => "reward_overflow",
            EscrowError::Ledger(LedgerError::InsufficientFunds { .. }) => "insufficient_funds",
            EscrowError::Ledger(_) => "ledger_error",
        }
    }
}
