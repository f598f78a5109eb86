//! The polling engine.
//!
//! A [`Watcher`] owns every piece of mutable state (sent flags, pool
//! recency, slot transitions) and is driven by a single task:
//!
//! ```text
//! tick ──► fetch flights ──► fetch slot tables ──► evaluate rules ──► dispatch ──► persist
//!   ▲                                                                               │
//!   └──────────────────────────── poll_interval ◄───────────────────────────────────┘
//! ```
//!
//! Console requests arrive as [`ConsoleCommand`]s on an mpsc channel and are
//! executed by the same task between cycles, so manual and automatic sends
//! never interleave.

mod command;
mod config;
mod latch;
mod watcher;

pub use command::{ConsoleCommand, WatchStatus};
pub use config::{StatePaths, WatchConfig};
pub use latch::ErrorLatch;
pub use watcher::{CycleReport, Watcher};
