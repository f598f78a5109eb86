//! Configuration management CLI commands.

use clap::Subcommand;
use gocwatch::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective settings (environment overrides applied)
    Show,

    /// Create the configuration file with defaults if it does not exist
    Init,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
        ConfigCommands::Show => run_show(),
        ConfigCommands::Init => run_init(),
    }
}

fn run_show() -> Result<(), CliError> {
    let mut config = ConfigFile::load()?;
    config.apply_env();

    let logon = match &config.hoppie.logon {
        Some(logon) => mask(logon),
        None => "(not set)".to_string(),
    };

    println!("[hoppie]");
    println!("  logon        = {}", logon);
    println!("  station      = {}", config.hoppie.station);
    println!("  url          = {}", config.hoppie.url);
    println!("  header       = {}", config.hoppie.header);
    println!("[network]");
    println!("  vatsim_url   = {}", config.network.vatsim_url);
    println!("  cdm_url      = {}", config.network.cdm_url);
    println!("  fleet_prefix = {}", config.network.fleet_prefix);
    println!("  timeout      = {}s", config.network.timeout);
    println!("[watch]");
    println!("  poll_interval       = {}s", config.watch.poll_interval);
    println!("  arrival_distance_nm = {}", config.watch.arrival_distance_nm);
    println!("  state_dir           = {}", config.watch.state_dir.display());
    println!("  gates_dir           = {}", config.watch.gates_dir.display());
    println!("[rules]");
    println!("  welcome = {}  arrival = {}  tsat = {}", config.rules.welcome, config.rules.arrival, config.rules.tsat);
    println!(
        "  welcome_requires_ground = {} (<= {} ft, <= {} kt)",
        config.rules.welcome_requires_ground,
        config.rules.ground_max_altitude_ft,
        config.rules.ground_max_groundspeed_kt
    );
    println!("[airports]");
    for (icao, c) in &config.airports {
        println!("  {} = {}, {}", icao, c.latitude, c.longitude);
    }
    println!("[logging]");
    println!("  file = {}", config.logging.file.display());
    Ok(())
}

fn run_init() -> Result<(), CliError> {
    let (path, created) = ConfigFile::ensure_exists()?;
    if created {
        println!("Created {}", path.display());
        println!("Set logon under [hoppie] before running 'gocwatch run'.");
    } else {
        println!("Configuration file already exists: {}", path.display());
    }
    Ok(())
}

/// Keep the first two characters of a secret.
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(2).collect();
    let hidden = secret.chars().count().saturating_sub(2).max(4);
    format!("{}{}", visible, "*".repeat(hidden))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("abcdefgh"), "ab******");
        assert_eq!(mask("ab"), "ab****");
        assert_eq!(mask(""), "****");
    }
}
