//! The escrow state machine.

mod events;
mod machine;
mod record;

pub use events::{ChallengeCreated, Claimed, EscrowEvent, Reclaimed, RevealAccepted, RewardsComputed};
pub use machine::{Call, Escrow, RevealReceipt};
pub use record::{ChallengeInfo, GameRecord, RecordStatus, Role};
