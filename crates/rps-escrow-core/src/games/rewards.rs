//! Payout computation for a resolved game.

use super::rps::{Move, Outcome};
use crate::error::EscrowError;
use serde::{Deserialize, Serialize};

/// Credited balances produced by resolving a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    pub outcome: Outcome,
    pub proposer: u64,
    pub counterparty: u64,
}

impl Rewards {
    pub fn total(&self) -> u64 {
        self.proposer + self.counterparty
    }
}

/// Split two stakes according to the revealed moves.
///
/// A draw refunds each stake to its owner; otherwise the winner is credited
/// both stakes and the loser nothing.
pub fn compute_rewards(
    proposer_move: Move,
    counterparty_move: Move,
    proposer_stake: u64,
    counterparty_stake: u64,
) -> Result<Rewards, EscrowError> {
    let outcome = proposer_move.against(counterparty_move);
    let pot = proposer_stake
        .checked_add(counterparty_stake)
        .ok_or(EscrowError::RewardOverflow)?;

    let (proposer, counterparty) = match outcome {
        Outcome::Draw => (proposer_stake, counterparty_stake),
        Outcome::ProposerWins => (pot, 0),
        Outcome::CounterpartyWins => (0, pot),
    };

    Ok(Rewards {
        outcome,
        proposer,
        counterparty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rock_loses_to_paper() {
        let rewards = compute_rewards(Move::Rock, Move::Paper, 1234, 1234).unwrap();
        assert_eq!(rewards.outcome, Outcome::CounterpartyWins);
        assert_eq!(rewards.proposer, 0);
        assert_eq!(rewards.counterparty, 2468);
    }

    #[test]
    fn test_draw_refunds_each_stake() {
        for mv in Move::ALL {
            let rewards = compute_rewards(mv, mv, 700, 700).unwrap();
            assert_eq!(rewards.outcome, Outcome::Draw);
            assert_eq!(rewards.proposer, 700);
            assert_eq!(rewards.counterparty, 700);
        }
    }

    #[test]
    fn test_rewards_conserve_the_pot() {
        for a in Move::ALL {
            for b in Move::ALL {
                let rewards = compute_rewards(a, b, 1001, 1001).unwrap();
                assert_eq!(rewards.total(), 2002, "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_overflowing_pot_is_rejected() {
        let result = compute_rewards(Move::Rock, Move::Scissors, u64::MAX, 1);
        assert!(matches!(result, Err(EscrowError::RewardOverflow)));
    }
}
