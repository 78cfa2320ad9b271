//! Escrow operations.
//!
//! Each operation validates every precondition before it touches the
//! ledger, performs at most one transfer, and only then mutates the
//! registry. A rejected call therefore leaves no trace.

use super::events::{
    ChallengeCreated, Claimed, EscrowEvent, Reclaimed, RevealAccepted, RewardsComputed,
};
use super::record::{ChallengeInfo, GameRecord, RecordStatus, Role};
use crate::config::EscrowConfig;
use crate::crypto::{CommitmentHash, Secret};
use crate::error::EscrowError;
use crate::games::{compute_rewards, Move, Rewards};
use crate::ledger::{AccountId, Ledger};
use std::collections::HashMap;
use tracing::{info, warn};

/// Caller context of an operation: who is calling and how much value the
/// call carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Call {
    pub sender: AccountId,
    pub value: u64,
}

impl Call {
    /// A call carrying no value
    pub fn from(sender: AccountId) -> Self {
        Self { sender, value: 0 }
    }

    /// A payable call
    pub fn paying(sender: AccountId, value: u64) -> Self {
        Self { sender, value }
    }
}

/// Events produced by a single reveal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealReceipt {
    pub reveal: RevealAccepted,
    /// Present when this reveal was the second one and resolved the game
    pub rewards: Option<RewardsComputed>,
}

/// Escrow holding stakes for Rock-Paper-Scissors games
pub struct Escrow<L: Ledger> {
    ledger: L,
    /// Ledger account holding all escrowed value
    account: AccountId,
    config: EscrowConfig,
    games: HashMap<CommitmentHash, GameRecord>,
    events: Vec<EscrowEvent>,
}

impl<L: Ledger> Escrow<L> {
    pub fn new(ledger: L, config: EscrowConfig) -> Self {
        Self {
            ledger,
            account: AccountId::new(),
            config,
            games: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    /// The escrow's own ledger account
    pub fn account(&self) -> AccountId {
        self.account
    }

    /// Value held by the escrow account on the ledger
    pub fn balance(&self) -> u64 {
        self.ledger.balance(&self.account)
    }

    /// Value the registry still owes: stakes of unresolved records and
    /// credits of resolved ones. Always equal to [`Escrow::balance`].
    pub fn escrowed_total(&self) -> u64 {
        self.games.values().map(GameRecord::held).sum()
    }

    /// Everything emitted so far, oldest first
    pub fn events(&self) -> &[EscrowEvent] {
        &self.events
    }

    /// Full record stored under a commitment
    pub fn record(&self, commitment: &CommitmentHash) -> Option<&GameRecord> {
        self.games.get(commitment)
    }

    /// Lookup of `{proposer, stake, deadline}` for a commitment
    pub fn challenge(&self, commitment: &CommitmentHash) -> ChallengeInfo {
        self.games
            .get(commitment)
            .map(ChallengeInfo::from)
            .unwrap_or_default()
    }

    /// Same hashing scheme used to verify reveals
    pub fn hash_move(mv: Move, secret: &Secret) -> CommitmentHash {
        CommitmentHash::new(mv, secret)
    }

    /// Value sent to the escrow outside of any operation is refused.
    pub fn receive(&mut self, call: Call) -> Result<(), EscrowError> {
        warn!(
            "Rejected direct transfer of {} from {}",
            call.value, call.sender
        );
        Err(EscrowError::DirectValueTransferForbidden)
    }

    /// Register a new challenge under `commitment`, escrowing the call value
    /// until `now + timeout`.
    pub fn register_challenge(
        &mut self,
        call: Call,
        commitment: CommitmentHash,
        timeout: u64,
    ) -> Result<ChallengeCreated, EscrowError> {
        let result = self.try_register(call, commitment, timeout);
        rejected("register_challenge", &call, result)
    }

    fn try_register(
        &mut self,
        call: Call,
        commitment: CommitmentHash,
        timeout: u64,
    ) -> Result<ChallengeCreated, EscrowError> {
        if !self.config.allows(timeout) {
            return Err(EscrowError::InvalidTimeoutWindow {
                timeout,
                min: self.config.min_timeout,
                max: self.config.max_timeout,
            });
        }
        if call.value == 0 {
            return Err(EscrowError::ZeroStake);
        }
        if self.games.contains_key(&commitment) {
            return Err(EscrowError::DuplicateOrConflictingCommitment(commitment));
        }

        let deadline = self.ledger.now().saturating_add(timeout);
        self.ledger
            .transfer(&call.sender, &self.account, call.value)?;

        self.games.insert(
            commitment,
            GameRecord::new(call.sender, Role::Proposer, call.value, deadline),
        );

        let event = ChallengeCreated {
            commitment,
            proposer: call.sender,
            amount: call.value,
            deadline,
        };
        self.events.push(EscrowEvent::ChallengeCreated(event.clone()));

        info!(
            "Challenge {} registered by {} for {} until {}",
            commitment, call.sender, call.value, deadline
        );
        Ok(event)
    }

    /// Match the challenge at `game_key` with an equal stake, registering
    /// the acceptor's own commitment.
    pub fn accept_challenge(
        &mut self,
        call: Call,
        game_key: CommitmentHash,
        acceptor_commitment: CommitmentHash,
    ) -> Result<ChallengeCreated, EscrowError> {
        let result = self.try_accept(call, game_key, acceptor_commitment);
        rejected("accept_challenge", &call, result)
    }

    fn try_accept(
        &mut self,
        call: Call,
        game_key: CommitmentHash,
        acceptor_commitment: CommitmentHash,
    ) -> Result<ChallengeCreated, EscrowError> {
        let now = self.ledger.now();
        let game = self.proposer_record(&game_key)?;

        if game.is_reclaimed() {
            return Err(EscrowError::ChallengeClosed);
        }
        if game.counterparty.is_some() {
            return Err(EscrowError::AlreadyMatched);
        }
        if now >= game.deadline {
            return Err(EscrowError::ChallengeExpired {
                deadline: game.deadline,
            });
        }
        if call.sender == game.proposer {
            return Err(EscrowError::SelfMatchForbidden);
        }
        if call.value != game.stake {
            return Err(EscrowError::StakeMismatch {
                expected: game.stake,
                actual: call.value,
            });
        }
        if self.games.contains_key(&acceptor_commitment) {
            return Err(EscrowError::DuplicateOrConflictingCommitment(
                acceptor_commitment,
            ));
        }

        let deadline = now.saturating_add(self.config.reveal_window);
        self.ledger
            .transfer(&call.sender, &self.account, call.value)?;

        if let Some(game) = self.games.get_mut(&game_key) {
            game.counterparty = Some(acceptor_commitment);
            game.deadline = deadline;
            game.status = RecordStatus::Matched;
        }

        let mut acceptor = GameRecord::new(call.sender, Role::Acceptor, call.value, deadline);
        acceptor.counterparty = Some(game_key);
        acceptor.status = RecordStatus::Matched;
        self.games.insert(acceptor_commitment, acceptor);

        let event = ChallengeCreated {
            commitment: acceptor_commitment,
            proposer: call.sender,
            amount: call.value,
            deadline,
        };
        self.events.push(EscrowEvent::ChallengeCreated(event.clone()));

        info!(
            "Challenge {} accepted by {} with {}, reveals due by {}",
            game_key, call.sender, acceptor_commitment, deadline
        );
        Ok(event)
    }

    /// Reveal the move behind one of the game's commitments. The second
    /// valid reveal resolves the game and credits both parties.
    pub fn deposit_reveal(
        &mut self,
        call: Call,
        game_key: CommitmentHash,
        mv: Move,
        secret: Secret,
    ) -> Result<RevealReceipt, EscrowError> {
        let result = self.try_reveal(call, game_key, mv, secret);
        rejected("deposit_reveal", &call, result)
    }

    fn try_reveal(
        &mut self,
        call: Call,
        game_key: CommitmentHash,
        mv: Move,
        secret: Secret,
    ) -> Result<RevealReceipt, EscrowError> {
        let acceptor_key = self.matched_counterparty(&game_key)?;
        let (game, acceptor) = (&self.games[&game_key], &self.games[&acceptor_key]);
        if game.is_reclaimed() || acceptor.is_reclaimed() {
            return Err(EscrowError::ChallengeClosed);
        }

        let (revealed, target, other) = if game_key.verify(mv, &secret) {
            (game_key, game, acceptor)
        } else if acceptor_key.verify(mv, &secret) {
            (acceptor_key, acceptor, game)
        } else {
            return Err(EscrowError::CommitmentVerificationFailed);
        };

        if target.proposer != call.sender {
            return Err(EscrowError::UnauthorizedParty(call.sender));
        }
        if target.revealed.is_some() {
            return Err(EscrowError::AlreadyRevealed(revealed));
        }

        let rewards = match other.revealed {
            Some(other_move) => {
                let (proposer_move, acceptor_move) = if revealed == game_key {
                    (mv, other_move)
                } else {
                    (other_move, mv)
                };
                Some(compute_rewards(
                    proposer_move,
                    acceptor_move,
                    game.stake,
                    acceptor.stake,
                )?)
            }
            None => None,
        };

        if let Some(record) = self.games.get_mut(&revealed) {
            record.revealed = Some(mv);
            record.status = RecordStatus::Revealed;
        }

        let reveal = RevealAccepted {
            game_key,
            player: call.sender,
            mv,
            secret,
        };
        self.events.push(EscrowEvent::RevealAccepted(reveal.clone()));
        info!("Move revealed for {} by {}", revealed, call.sender);

        let rewards = rewards.map(|rewards| self.resolve(game_key, acceptor_key, rewards));

        Ok(RevealReceipt { reveal, rewards })
    }

    /// Credit both parties. Stakes stay on the records until the payout is
    /// claimed.
    fn resolve(
        &mut self,
        game_key: CommitmentHash,
        acceptor_key: CommitmentHash,
        rewards: Rewards,
    ) -> RewardsComputed {
        for (key, reward) in [
            (game_key, rewards.proposer),
            (acceptor_key, rewards.counterparty),
        ] {
            if let Some(record) = self.games.get_mut(&key) {
                record.credited = reward;
                record.outcome = Some(rewards.outcome);
                record.status = if reward == 0 {
                    RecordStatus::Settled
                } else {
                    RecordStatus::Resolved
                };
            }
        }

        let event = RewardsComputed {
            game_key,
            proposer_reward: rewards.proposer,
            counterparty_reward: rewards.counterparty,
        };
        self.events.push(EscrowEvent::RewardsComputed(event.clone()));

        info!(
            "Game {} resolved: {} ({} / {})",
            game_key, rewards.outcome, rewards.proposer, rewards.counterparty
        );
        event
    }

    /// Pay out the caller's credited balance for a resolved game.
    pub fn claim(&mut self, call: Call, game_key: CommitmentHash) -> Result<Claimed, EscrowError> {
        let result = self.try_claim(call, game_key);
        rejected("claim", &call, result)
    }

    fn try_claim(&mut self, call: Call, game_key: CommitmentHash) -> Result<Claimed, EscrowError> {
        let game = self.proposer_record(&game_key)?;
        let acceptor_key = match game.counterparty {
            Some(key) if game.is_resolved() => key,
            _ => return Err(EscrowError::GameNotYetResolved),
        };

        let target = if game.proposer == call.sender {
            game_key
        } else if self.games[&acceptor_key].proposer == call.sender {
            acceptor_key
        } else {
            return Err(EscrowError::UnauthorizedParty(call.sender));
        };

        let amount = self.games[&target].credited;
        if amount == 0 {
            return Err(EscrowError::ZeroCreditedBalance);
        }

        self.ledger.transfer(&self.account, &call.sender, amount)?;

        let other = if target == game_key { acceptor_key } else { game_key };
        if let Some(record) = self.games.get_mut(&target) {
            record.stake = 0;
            record.credited = 0;
            record.status = RecordStatus::Settled;
        }
        // A losing record's stake leaves with the winner's payout
        if let Some(record) = self.games.get_mut(&other) {
            if record.status == RecordStatus::Settled && record.credited == 0 {
                record.stake = 0;
            }
        }

        let event = Claimed {
            game_key,
            player: call.sender,
            amount,
        };
        self.events.push(EscrowEvent::Claimed(event.clone()));

        info!("{} claimed {} from game {}", call.sender, amount, game_key);
        Ok(event)
    }

    /// Return an unresolved stake to its owner once the record's deadline
    /// has passed.
    pub fn reclaim_timeout(
        &mut self,
        call: Call,
        commitment: CommitmentHash,
    ) -> Result<Reclaimed, EscrowError> {
        let result = self.try_reclaim(call, commitment);
        rejected("reclaim_timeout", &call, result)
    }

    fn try_reclaim(
        &mut self,
        call: Call,
        commitment: CommitmentHash,
    ) -> Result<Reclaimed, EscrowError> {
        let now = self.ledger.now();
        let record = self
            .games
            .get(&commitment)
            .ok_or(EscrowError::UnknownCommitment(commitment))?;

        if now < record.deadline {
            return Err(EscrowError::DeadlineNotReached {
                now,
                deadline: record.deadline,
            });
        }
        if record.proposer != call.sender {
            return Err(EscrowError::UnauthorizedParty(call.sender));
        }
        let reclaimable = matches!(
            record.status,
            RecordStatus::Registered | RecordStatus::Matched | RecordStatus::Revealed
        );
        if !reclaimable || record.stake == 0 {
            return Err(EscrowError::NothingToReclaim);
        }

        let amount = record.stake;
        self.ledger.transfer(&self.account, &call.sender, amount)?;

        if let Some(record) = self.games.get_mut(&commitment) {
            record.stake = 0;
            record.status = RecordStatus::Reclaimed;
        }

        let event = Reclaimed {
            commitment,
            player: call.sender,
            amount,
        };
        self.events.push(EscrowEvent::Reclaimed(event.clone()));

        info!("{} reclaimed {} from {}", call.sender, amount, commitment);
        Ok(event)
    }

    /// The record at `game_key`, which must be a proposer's record.
    fn proposer_record(&self, game_key: &CommitmentHash) -> Result<&GameRecord, EscrowError> {
        let record = self
            .games
            .get(game_key)
            .ok_or(EscrowError::UnknownCommitment(*game_key))?;
        if record.role != Role::Proposer {
            return Err(EscrowError::NotAGameKey(*game_key));
        }
        Ok(record)
    }

    fn matched_counterparty(&self, game_key: &CommitmentHash) -> Result<CommitmentHash, EscrowError> {
        self.proposer_record(game_key)?
            .counterparty
            .ok_or(EscrowError::ChallengeNotMatched)
    }
}

fn rejected<T>(
    operation: &str,
    call: &Call,
    result: Result<T, EscrowError>,
) -> Result<T, EscrowError> {
    if let Err(err) = &result {
        warn!(
            "{} from {} rejected ({}): {}",
            operation,
            call.sender,
            err.kind(),
            err
        );
    }
    result
}
