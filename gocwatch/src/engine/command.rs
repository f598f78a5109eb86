//! Requests from the interactive console to the polling task.

use tokio::sync::oneshot;

use super::watcher::CycleReport;
use crate::acars::DeliveryError;

/// A console request, executed by the polling task between cycles.
#[derive(Debug)]
pub enum ConsoleCommand {
    /// Send a free-text telex.
    Telex {
        to: String,
        text: String,
        reply: oneshot::Sender<Result<String, DeliveryError>>,
    },
    /// Send the link test message.
    Ping {
        to: String,
        reply: oneshot::Sender<Result<String, DeliveryError>>,
    },
    /// Report the watcher's state.
    Status { reply: oneshot::Sender<WatchStatus> },
    /// Persist state and stop the loop.
    Shutdown,
}

/// Snapshot of the watcher's state for the `status` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchStatus {
    /// Completed poll cycles.
    pub cycles: u64,
    /// One-shot notifications already sent (persisted).
    pub fired_flags: usize,
    /// Flight/airport pairs with a tracked slot state.
    pub tracked_slots: usize,
    /// Whether the flight feed failed on its last fetch.
    pub feed_failing: bool,
    /// Base airports in scope.
    pub airports: Vec<String>,
    /// Outcome of the most recent cycle.
    pub last_cycle: Option<CycleReport>,
}
