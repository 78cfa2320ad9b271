//! Notifications emitted by escrow operations.

use crate::crypto::{CommitmentHash, Secret};
use crate::games::Move;
use crate::ledger::AccountId;
use serde::{Deserialize, Serialize};

/// A challenge was registered, either fresh or as an acceptance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeCreated {
    pub commitment: CommitmentHash,
    pub proposer: AccountId,
    pub amount: u64,
    pub deadline: u64,
}

/// A move was revealed and matched its commitment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealAccepted {
    pub game_key: CommitmentHash,
    pub player: AccountId,
    #[serde(rename = "move")]
    pub mv: Move,
    pub secret: Secret,
}

/// Both moves are in and the payout is credited
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsComputed {
    pub game_key: CommitmentHash,
    pub proposer_reward: u64,
    pub counterparty_reward: u64,
}

/// A credited balance was paid out
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claimed {
    pub game_key: CommitmentHash,
    pub player: AccountId,
    pub amount: u64,
}

/// An unresolved stake was returned after its deadline
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reclaimed {
    pub commitment: CommitmentHash,
    pub player: AccountId,
    pub amount: u64,
}

/// Entry of the escrow's append-only event log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EscrowEvent {
    ChallengeCreated(ChallengeCreated),
    RevealAccepted(RevealAccepted),
    RewardsComputed(RewardsComputed),
    Claimed(Claimed),
    Reclaimed(Reclaimed),
}

impl EscrowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            EscrowEvent::ChallengeCreated(_) => "ChallengeCreated",
            EscrowEvent::RevealAccepted(_) => "RevealAccepted",
            EscrowEvent::RewardsComputed(_) => "RewardsComputed",
            EscrowEvent::Claimed(_) => "Claimed",
            EscrowEvent::Reclaimed(_) => "Reclaimed",
        }
    }
}
