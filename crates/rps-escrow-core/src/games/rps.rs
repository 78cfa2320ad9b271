//! Rock-Paper-Scissors moves and judging.

use crate::error::EscrowError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rock-Paper-Scissors move
///
/// On the wire a move is a one-byte code; `0` means "no move" and never
/// converts into a `Move`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Wire code used when hashing a commitment
    pub fn code(&self) -> u8 {
        match self {
            Move::Rock => 1,
            Move::Paper => 2,
            Move::Scissors => 3,
        }
    }

    /// Check if this move beats the other
    pub fn beats(&self, other: &Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors)
                | (Move::Scissors, Move::Paper)
                | (Move::Paper, Move::Rock)
        )
    }

    /// Judge the proposer's move against the counterparty's
    pub fn against(self, counterparty: Move) -> Outcome {
        if self == counterparty {
            Outcome::Draw
        } else if self.beats(&counterparty) {
            Outcome::ProposerWins
        } else {
            Outcome::CounterpartyWins
        }
    }
}

impl TryFrom<u8> for Move {
    type Error = EscrowError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Move::Rock),
            2 => Ok(Move::Paper),
            3 => Ok(Move::Scissors),
            other => Err(EscrowError::InvalidMove(other)),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Rock => write!(f, "Rock"),
            Move::Paper => write!(f, "Paper"),
            Move::Scissors => write!(f, "Scissors"),
        }
    }
}

/// Result of a resolved game, seen from the game key's owner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    ProposerWins,
    CounterpartyWins,
    Draw,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::ProposerWins => "proposer wins",
            Outcome::CounterpartyWins => "counterparty wins",
            Outcome::Draw => "draw",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
