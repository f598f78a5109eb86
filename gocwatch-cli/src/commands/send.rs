//! One-off telex commands.

use gocwatch::acars::MessageSink;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Send a free-text telex.
pub async fn run_send(callsign: &str, message: &[String]) -> Result<(), CliError> {
    let text = message.join(" ");
    if text.trim().is_empty() {
        return Err(CliError::Usage("Message must not be empty".to_string()));
    }

    let runner = CliRunner::new(false, false)?;
    runner.log_startup("send");
    deliver(&runner, callsign, &text, "TELEX").await
}

/// Send the link test message.
pub async fn run_ping(callsign: &str) -> Result<(), CliError> {
    let runner = CliRunner::new(false, false)?;
    runner.log_startup("ping");
    let text = runner.templates().ping();
    deliver(&runner, callsign, &text, "Ping").await
}

async fn deliver(runner: &CliRunner, callsign: &str, text: &str, kind: &str) -> Result<(), CliError> {
    let client = runner.hoppie_client()?;
    let to = callsign.trim().to_uppercase();

    let ack = client.deliver(&to, text).await?;
    tracing::info!(to = %to, ack = %ack, "{} sent", kind);
    println!("{} sent to {} from {} (ok: {})", kind, to, client.station(), ack);
    Ok(())
}
