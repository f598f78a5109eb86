//! Run command - the watcher with its interactive console.

use tokio::sync::mpsc;

use gocwatch::cdm::CdmClient;
use gocwatch::engine::{CycleReport, WatchConfig, Watcher};
use gocwatch::network::VatsimClient;
use gocwatch::stand::JsonRuleSource;

use crate::console::{run_console, HELP};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Capacity of the console command channel.
const COMMAND_CHANNEL_CAPACITY: usize = 16;

/// Start the watcher. With `once`, run a single cycle and exit.
pub async fn run(debug: bool, once: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(true, debug)?;
    runner.log_startup("run");
    let config = runner.config();

    let sink = runner.hoppie_client()?;
    let flights = VatsimClient::new(
        &config.network.vatsim_url,
        &config.network.fleet_prefix,
        runner.timeout(),
    )?;
    let slots = CdmClient::new(&config.network.cdm_url, runner.timeout())?;

    let rules = JsonRuleSource::new(&config.watch.gates_dir);
    if !rules.dir().is_dir() {
        tracing::warn!(
            gates_dir = %rules.dir().display(),
            "Stand rules directory not found, arrival stands will be TBD"
        );
    }

    let watch_config = WatchConfig::from_config_file(config);
    let station = sink.station().to_string();
    let mut watcher = Watcher::open(flights, slots, sink, rules, runner.templates(), watch_config)?;

    if once {
        let report = watcher.run_cycle().await;
        print_report(&report);
        return Ok(());
    }

    println!("> {} - watcher running", config.hoppie.header);
    println!();
    println!("{}", HELP);
    println!();
    println!(
        "Airports: {} | Poll: {}s | Station: {}",
        config.airports.keys().cloned().collect::<Vec<_>>().join(", "),
        config.watch.poll_interval,
        station
    );
    println!();

    let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    let watcher_task = tokio::spawn(watcher.run(rx));

    run_console(tx).await;

    if let Err(e) = watcher_task.await {
        tracing::error!(error = %e, "Watcher task failed");
    }
    Ok(())
}

fn print_report(report: &CycleReport) {
    if !report.feed_ok {
        println!("Flight feed unavailable; nothing evaluated.");
        return;
    }
    println!("Flights online:   {}", report.flights);
    println!("Welcome messages: {}", report.welcomes);
    println!("Arrival packages: {}", report.arrivals);
    println!("Slot updates:     {}", report.slot_updates);
    if report.delivery_failures > 0 {
        println!("Not delivered:    {}", report.delivery_failures);
    }
    if report.slot_failures > 0 {
        println!("Slot tables unavailable: {}", report.slot_failures);
    }
}
