//! One-shot trigger tracking and slot-time transitions.
//!
//! - [`SentFlagStore`] remembers which one-shot notifications already went
//!   out. It is persisted, so a restart never re-sends a welcome or an
//!   arrival package.
//! - [`TransitionLog`] remembers the last observed departure-slot state per
//!   flight and airport, in memory only. After a restart each flight's
//!   current slot state is announced once more.
//!
//! # Ordering
//!
//! A one-shot trigger is consulted with [`SentFlagStore::should_fire`]
//! before the message is dispatched and marked with
//! [`SentFlagStore::mark_fired`] right after, whatever the delivery outcome.
//! A failed delivery is therefore never retried.

mod flags;
mod slot;

pub use flags::{ConditionKind, FlagKey, SentFlagStore};
pub use slot::{is_placeholder, SlotState, SlotTransition, TransitionLog};
