//! Practice Rounds
//!
//! A round is a board of word/meaning card pairs. When a pair is matched and
//! unseen words remain, one replacement is drawn through the session selector
//! and handed back as a [`ReplenishmentTicket`]; the caller waits out the
//! ticket's delay and then calls [`Round::complete_replenishment`] to swap the
//! cards in. The core owns no timers.
//!
//! Slot lifecycle:
//!
//! ```text
//! Active(word) --match--> AwaitingReplenishment { matched, incoming } --swap--> Active(incoming)
//!      |
//!      +--match, pool exhausted--> Cleared
//! ```
//!
//! Operations aimed at a pair that is no longer on the board resolve to
//! `Stale` instead of failing.

mod round;

pub use round::{
    MatchResult, Replenishment, ReplenishmentTicket, Round, RoundConfig, RoundError, RoundStatus,
    SlotState, SwapResult,
};
