//! Assign command - predict a stand from the configured rule sets.

use gocwatch::engine::StatePaths;
use gocwatch::stand::{Assignment, JsonRuleSource, LruState, RuleSetError, StandAllocator};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Resolve a stand for `callsign` at `airport`.
///
/// Pool selections update the persisted recency state unless `dry_run` is set.
pub fn run(
    airport: &str,
    callsign: &str,
    aircraft: Option<&str>,
    dry_run: bool,
) -> Result<(), CliError> {
    let runner = CliRunner::new(false, false)?;
    runner.log_startup("assign");
    let config = runner.config();

    let airport = airport.trim().to_uppercase();
    let callsign = callsign.trim().to_uppercase();
    let paths = StatePaths::in_dir(&config.watch.state_dir);

    let lru = LruState::load(&paths.lru_state)?;
    let rules = JsonRuleSource::new(&config.watch.gates_dir);
    let gates_dir = rules.dir().to_path_buf();
    let mut allocator = StandAllocator::new(rules, lru);

    let assignment = match allocator.try_assign(&airport, &callsign, aircraft.unwrap_or("")) {
        Ok(assignment) => assignment,
        Err(RuleSetError::Missing { .. }) => {
            println!("No stand rules for {} in {}", airport, gates_dir.display());
            Assignment::fallback()
        }
        Err(e) => return Err(CliError::Rules(e)),
    };

    println!("{} @ {}: STAND {} ({})", callsign, airport, assignment.stand, assignment.label);

    if dry_run {
        if allocator.is_dirty() {
            println!("(dry run, pool rotation not saved)");
        }
        return Ok(());
    }

    allocator.persist(&paths.lru_state)?;
    Ok(())
}
