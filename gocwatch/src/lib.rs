//! GOC Watch - operational ACARS notifications for a virtual airline fleet.
//!
//! The library watches the VATSIM live feed and the CDM departure-sequencing
//! pages of a set of base airports, and sends each fleet flight one-shot or
//! on-change telex messages through Hoppie ACARS:
//!
//! - a welcome message the first time a flight is seen,
//! - an arrival package with a predicted stand once the flight is within the
//!   configured distance of its base arrival airport,
//! - a TSAT update whenever the published start-up slot changes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ FlightSource │   │  SlotSource  │   │ MessageSink  │
//! │  (VATSIM)    │   │    (CDM)     │   │  (Hoppie)    │
//! └──────┬───────┘   └──────┬───────┘   └──────▲───────┘
//!        │                  │                  │
//!        └──────────┬───────┘                  │
//!                   ▼                          │
//!            ┌─────────────┐                   │
//!            │   Watcher   │───────────────────┘
//!            │ (poll loop) │
//!            └──┬───────┬──┘
//!               │       │
//!   ┌───────────▼──┐ ┌──▼──────────────┐
//!   │StandAllocator│ │ SentFlagStore / │
//!   │ + LruState   │ │ TransitionLog   │
//!   └──────────────┘ └─────────────────┘
//! ```

pub mod acars;
pub mod cdm;
pub mod config;
pub mod engine;
pub mod error;
pub mod flight;
pub mod geo;
pub mod logging;
pub mod message;
pub mod network;
pub mod persist;
pub mod stand;
pub mod trigger;

/// Version of the GOC Watch library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
