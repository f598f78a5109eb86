//! The watcher: one poll cycle and the loop around it.

use std::collections::{BTreeSet, HashMap};
use std::ops::ControlFlow;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::command::{ConsoleCommand, WatchStatus};
use super::config::WatchConfig;
use super::latch::ErrorLatch;
use crate::acars::MessageSink;
use crate::cdm::{SlotSource, SlotTable};
use crate::flight::FlightSnapshot;
use crate::message::MessageTemplates;
use crate::network::FlightSource;
use crate::persist::StoreError;
use crate::stand::{Clock, LruState, RuleSetSource, StandAllocator};
use crate::trigger::{FlagKey, SentFlagStore, SlotState, TransitionLog};

const FEED_SOURCE: &str = "vatsim";

/// Counters for one poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Whether the flight feed was fetched.
    pub feed_ok: bool,
    /// Fleet flights online.
    pub flights: usize,
    /// Slot tables that failed to load.
    pub slot_failures: usize,
    /// Welcome messages dispatched.
    pub welcomes: usize,
    /// Arrival packages dispatched.
    pub arrivals: usize,
    /// Slot notifications dispatched.
    pub slot_updates: usize,
    /// Dispatches the network did not accept.
    pub delivery_failures: usize,
}

impl CycleReport {
    /// Total messages dispatched, delivered or not.
    pub fn dispatched(&self) -> usize {
        self.welcomes + self.arrivals + self.slot_updates
    }
}

/// Owns all engine state and the data source handles.
pub struct Watcher<F, S, M, R> {
    flights: F,
    slots: S,
    sink: M,
    allocator: StandAllocator<R>,
    flags: SentFlagStore,
    flags_dirty: bool,
    transitions: TransitionLog,
    templates: MessageTemplates,
    config: WatchConfig,
    latch: ErrorLatch,
    cycles: u64,
    last_report: Option<CycleReport>,
}

impl<F, S, M, R> Watcher<F, S, M, R>
where
    F: FlightSource,
    S: SlotSource,
    M: MessageSink,
    R: RuleSetSource,
{
    /// Create a watcher, loading persisted state from the configured paths.
    ///
    /// A missing state document starts empty; a corrupt one is an error.
    pub fn open(
        flights: F,
        slots: S,
        sink: M,
        rules: R,
        templates: MessageTemplates,
        config: WatchConfig,
    ) -> Result<Self, StoreError> {
        let flags = SentFlagStore::load(&config.state.sent_flags)?;
        let lru = LruState::load(&config.state.lru_state)?;

        tracing::info!(
            fired = flags.len(),
            sent_flags = %config.state.sent_flags.display(),
            "Loaded watcher state"
        );

        Ok(Self {
            flights,
            slots,
            sink,
            allocator: StandAllocator::new(rules, lru),
            flags,
            flags_dirty: false,
            transitions: TransitionLog::new(),
            templates,
            config,
            latch: ErrorLatch::new(),
            cycles: 0,
            last_report: None,
        })
    }

    /// Replace the clock used to stamp stand assignments.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.allocator = self.allocator.with_clock(clock);
        self
    }

    /// Sent flags.
    pub fn flags(&self) -> &SentFlagStore {
        &self.flags
    }

    /// Stand pool recency.
    pub fn lru(&self) -> &LruState {
        self.allocator.lru()
    }

    /// Current state snapshot.
    pub fn status(&self) -> WatchStatus {
        WatchStatus {
            cycles: self.cycles,
            fired_flags: self.flags.len(),
            tracked_slots: self.transitions.len(),
            feed_failing: self.latch.is_failing(FEED_SOURCE),
            airports: self.config.airports.keys().cloned().collect(),
            last_cycle: self.last_report.clone(),
        }
    }

    /// Run one poll cycle: fetch, evaluate, dispatch, persist.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        let flights = match self.flights.fetch_live_flights().await {
            Ok(flights) => {
                if self.latch.clear(FEED_SOURCE) {
                    tracing::info!("Flight feed recovered");
                }
                flights
            }
            Err(e) => {
                if self.latch.report(FEED_SOURCE, &e.to_string()) {
                    tracing::warn!(error = %e, "Flight feed unavailable, skipping cycle");
                }
                self.finish_cycle(report.clone());
                return report;
            }
        };
        report.feed_ok = true;
        report.flights = flights.len();

        let slot_tables = if self.config.rules.tsat {
            self.fetch_slot_tables(&flights, &mut report).await
        } else {
            HashMap::new()
        };

        for flight in &flights {
            if self.config.rules.welcome {
                self.evaluate_welcome(flight, &mut report).await;
            }
            if self.config.rules.arrival {
                self.evaluate_arrival(flight, &mut report).await;
            }
            if let Some(table) = slot_tables.get(&flight.departure) {
                self.evaluate_slot(flight, table, &mut report).await;
            }
        }

        let pruned = self
            .transitions
            .retain_online(flights.iter().map(|f| f.callsign.as_str()));
        if pruned > 0 {
            tracing::debug!(pruned, "Dropped slot state of offline flights");
        }

        self.commit();
        tracing::debug!(
            flights = report.flights,
            dispatched = report.dispatched(),
            failures = report.delivery_failures,
            "Cycle complete"
        );
        self.finish_cycle(report.clone());
        report
    }

    /// Persist whatever state changed. Failures are logged and retried on the next commit.
    pub fn commit(&mut self) {
        if self.flags_dirty {
            match self.flags.save(&self.config.state.sent_flags) {
                Ok(()) => self.flags_dirty = false,
                Err(e) => tracing::error!(error = %e, "Failed to persist sent flags"),
            }
        }

        if let Err(e) = self.allocator.persist(&self.config.state.lru_state) {
            tracing::error!(error = %e, "Failed to persist stand recency");
        }
    }

    /// Execute a console request.
    pub async fn handle_command(&mut self, command: ConsoleCommand) -> ControlFlow<()> {
        match command {
            ConsoleCommand::Telex { to, text, reply } => {
                let result = self.sink.deliver(&to, &text).await;
                log_manual("telex", &to, &result);
                let _ = reply.send(result);
            }
            ConsoleCommand::Ping { to, reply } => {
                let result = self.sink.deliver(&to, &self.templates.ping()).await;
                log_manual("ping", &to, &result);
                let _ = reply.send(result);
            }
            ConsoleCommand::Status { reply } => {
                let _ = reply.send(self.status());
            }
            ConsoleCommand::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Poll until shutdown is requested or the command channel closes.
    pub async fn run(mut self, mut commands: mpsc::Receiver<ConsoleCommand>) {
        tracing::info!(
            airports = ?self.config.airports.keys().collect::<Vec<_>>(),
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "Watcher started"
        );

        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.run_cycle().await;
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        tracing::debug!("Command channel closed, stopping");
                        break;
                    };
                    if self.handle_command(command).await.is_break() {
                        break;
                    }
                }
            }
        }

        self.commit();
        tracing::info!("Watcher stopped");
    }

    fn finish_cycle(&mut self, report: CycleReport) {
        self.cycles += 1;
        self.last_report = Some(report);
    }

    /// Fetch the slot tables of base airports that fleet flights depart from.
    ///
    /// Failed airports are absent from the result, so their flights are not
    /// observed this cycle.
    async fn fetch_slot_tables(
        &mut self,
        flights: &[FlightSnapshot],
        report: &mut CycleReport,
    ) -> HashMap<String, SlotTable> {
        let airports: BTreeSet<&str> = flights
            .iter()
            .map(|f| f.departure.as_str())
            .filter(|apt| self.config.airports.contains_key(*apt))
            .collect();

        let mut tables = HashMap::new();
        for airport in airports {
            let source = format!("cdm:{}", airport);
            match self.slots.fetch_slot_table(airport).await {
                Ok(table) => {
                    if self.latch.clear(&source) {
                        tracing::info!(airport, "Slot table recovered");
                    }
                    tables.insert(airport.to_string(), table);
                }
                Err(e) => {
                    report.slot_failures += 1;
                    if self.latch.report(&source, &e.to_string()) {
                        tracing::warn!(airport, error = %e, "Slot table unavailable");
                    }
                }
            }
        }
        tables
    }

    async fn evaluate_welcome(&mut self, flight: &FlightSnapshot, report: &mut CycleReport) {
        let key = FlagKey::welcome(&flight.callsign);
        if !self.flags.should_fire(&key) {
            return;
        }

        let rules = &self.config.rules;
        if rules.welcome_requires_ground
            && !flight.is_on_ground(rules.ground_max_altitude_ft, rules.ground_max_groundspeed_kt)
        {
            return;
        }

        let text = self.templates.welcome(&flight.callsign);
        if !self.dispatch(&flight.callsign, &text, "welcome").await {
            report.delivery_failures += 1;
        }
        report.welcomes += 1;
        self.fire(key);
    }

    async fn evaluate_arrival(&mut self, flight: &FlightSnapshot, report: &mut CycleReport) {
        let Some(airport) = self.config.airport(&flight.arrival) else {
            return;
        };
        let distance_nm = flight.position.distance_nm(airport);
        if distance_nm > self.config.arrival_distance_nm {
            return;
        }

        let key = FlagKey::arrival(&flight.callsign, &flight.arrival);
        if !self.flags.should_fire(&key) {
            return;
        }

        let assignment =
            self.allocator
                .assign(&flight.arrival, &flight.callsign, &flight.aircraft_type);
        tracing::info!(
            callsign = %flight.callsign,
            airport = %flight.arrival,
            distance_nm = distance_nm.round(),
            stand = %assignment.stand,
            label = %assignment.label,
            "Arrival package"
        );

        let text = self.templates.arrival_package(
            &flight.callsign,
            &flight.arrival,
            distance_nm,
            &assignment,
        );
        if !self.dispatch(&flight.callsign, &text, "arrival").await {
            report.delivery_failures += 1;
        }
        report.arrivals += 1;
        self.fire(key);
    }

    async fn evaluate_slot(
        &mut self,
        flight: &FlightSnapshot,
        table: &SlotTable,
        report: &mut CycleReport,
    ) {
        let state = SlotState::classify(table.get(&flight.callsign).map(String::as_str));
        let Some(transition) = self
            .transitions
            .observe(&flight.callsign, &flight.departure, state)
        else {
            return;
        };

        tracing::info!(
            callsign = %flight.callsign,
            airport = %flight.departure,
            from = %transition.previous,
            to = %transition.current,
            "Slot state changed"
        );
        if !transition.notifies() {
            return;
        }

        let text = match transition.current.time() {
            Some(tsat) => self.templates.tsat_update(&flight.departure, tsat),
            None => self.templates.tsat_pending(&flight.departure),
        };
        if !self.dispatch(&flight.callsign, &text, "tsat").await {
            report.delivery_failures += 1;
        }
        report.slot_updates += 1;
    }

    /// Mark a one-shot trigger and persist right away.
    fn fire(&mut self, key: FlagKey) {
        if self.flags.mark_fired(key) {
            self.flags_dirty = true;
        }
        self.commit();
    }

    /// Send a message; returns whether the network accepted it.
    async fn dispatch(&self, callsign: &str, text: &str, kind: &str) -> bool {
        match self.sink.deliver(callsign, text).await {
            Ok(ack) => {
                tracing::info!(callsign, kind, ack = %ack, "Telex sent");
                true
            }
            Err(e) => {
                tracing::warn!(callsign, kind, error = %e, "Telex not delivered");
                false
            }
        }
    }
}

fn log_manual(kind: &str, to: &str, result: &Result<String, crate::acars::DeliveryError>) {
    match result {
        Ok(ack) => tracing::info!(to, kind, ack = %ack, "Manual telex sent"),
        Err(e) => tracing::warn!(to, kind, error = %e, "Manual telex failed"),
    }
}
