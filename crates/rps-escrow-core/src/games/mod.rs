//! Game definitions and payout logic.

mod rewards;
mod rps;

pub use rewards::{compute_rewards, Rewards};
pub use rps::{Move, Outcome};
