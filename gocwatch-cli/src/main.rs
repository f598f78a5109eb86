//! GOC Watch CLI - Command-line interface
//!
//! Watches the VATSIM network for the fleet and sends operational ACARS
//! telex messages through Hoppie.

mod commands;
mod console;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;

#[derive(Parser)]
#[command(name = "gocwatch")]
#[command(version = gocwatch::VERSION)]
#[command(about = "Operational ACARS notifications for a virtual airline fleet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the network and send notifications (interactive console)
    Run {
        /// Log at debug level
        #[arg(long)]
        debug: bool,

        /// Run a single poll cycle and exit
        #[arg(long)]
        once: bool,
    },

    /// Send a free-text telex to a callsign
    Send {
        /// Destination callsign
        callsign: String,

        /// Message text
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Send the test message to a callsign
    Ping {
        /// Destination callsign
        callsign: String,
    },

    /// Predict the stand for an arrival from the configured rules
    Assign {
        /// Arrival airport ICAO code
        airport: String,

        /// Flight callsign
        callsign: String,

        /// Aircraft type designator (e.g. A320)
        #[arg(long)]
        aircraft: Option<String>,

        /// Do not record pool rotation
        #[arg(long)]
        dry_run: bool,
    },

    /// List the fleet flights currently online
    Flights,

    /// Show fleet departure slots at each base airport
    Slots {
        /// Join with the live feed and report every online flight
        #[arg(long)]
        merge: bool,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { debug, once } => commands::run::run(debug, once).await,
        Commands::Send { callsign, message } => commands::send::run_send(&callsign, &message).await,
        Commands::Ping { callsign } => commands::send::run_ping(&callsign).await,
        Commands::Assign {
            airport,
            callsign,
            aircraft,
            dry_run,
        } => commands::assign::run(&airport, &callsign, aircraft.as_deref(), dry_run),
        Commands::Flights => commands::flights::run().await,
        Commands::Slots { merge } => commands::slots::run(merge).await,
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_send_joins_words() {
        let cli = Cli::try_parse_from(["gocwatch", "send", "HPF1", "CLEARED", "TO", "PUSH"]).unwrap();
        match cli.command {
            Commands::Send { callsign, message } => {
                assert_eq!(callsign, "HPF1");
                assert_eq!(message.join(" "), "CLEARED TO PUSH");
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_slots_merge_flag() {
        let cli = Cli::try_parse_from(["gocwatch", "slots", "--merge"]).unwrap();
        assert!(matches!(cli.command, Commands::Slots { merge: true }));
    }

    #[test]
    fn test_send_requires_message() {
        assert!(Cli::try_parse_from(["gocwatch", "send", "HPF1"]).is_err());
    }
}
