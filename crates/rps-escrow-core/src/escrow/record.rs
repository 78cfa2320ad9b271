//! Game records kept in the escrow registry.

use crate::crypto::CommitmentHash;
use crate::games::{Move, Outcome};
use crate::ledger::AccountId;
use serde::{Deserialize, Serialize};

/// Lifecycle of a single record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Stake escrowed, waiting for a counterparty
    Registered,
    /// Both stakes escrowed, waiting for this record's reveal
    Matched,
    /// This record's move is revealed, the other one is not
    Revealed,
    /// Rewards computed, credit waiting to be claimed
    Resolved,
    /// Nothing left to pay out
    Settled,
    /// Stake returned through a timeout withdrawal
    Reclaimed,
}

/// Which side of a game a record belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Registered the challenge; its commitment is the game key
    Proposer,
    /// Accepted someone else's challenge
    Acceptor,
}

/// A record keyed by its commitment hash
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Owner of the commitment
    pub proposer: AccountId,
    pub role: Role,
    /// Value escrowed for this record, zeroed once paid out by a claim or
    /// a timeout withdrawal
    pub stake: u64,
    /// Absolute ledger time after which the owner may reclaim
    pub deadline: u64,
    /// The other commitment of the game, once matched
    pub counterparty: Option<CommitmentHash>,
    pub revealed: Option<Move>,
    pub outcome: Option<Outcome>,
    /// Payout owed to `proposer` after resolution
    pub credited: u64,
    pub status: RecordStatus,
}

impl GameRecord {
    pub(crate) fn new(proposer: AccountId, role: Role, stake: u64, deadline: u64) -> Self {
        Self {
            proposer,
            role,
            stake,
            deadline,
            counterparty: None,
            revealed: None,
            outcome: None,
            credited: 0,
            status: RecordStatus::Registered,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.status, RecordStatus::Resolved | RecordStatus::Settled)
            && self.outcome.is_some()
    }

    pub fn is_reclaimed(&self) -> bool {
        self.status == RecordStatus::Reclaimed
    }

    /// Value this record still holds in escrow. Once resolved, the credit
    /// replaces the stake.
    pub fn held(&self) -> u64 {
        if self.is_resolved() {
            self.credited
        } else {
            self.stake
        }
    }
}

/// Public lookup view of a commitment slot. Unused slots read as empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeInfo {
    pub proposer: Option<AccountId>,
    pub stake: u64,
    pub deadline: u64,
}

impl From<&GameRecord> for ChallengeInfo {
    fn from(record: &GameRecord) -> Self {
        Self {
            proposer: Some(record.proposer),
            stake: record.stake,
            deadline: record.deadline,
        }
    }
}
