//! Interactive console for `gocwatch run`.
//!
//! Reads operator commands from stdin and forwards them to the polling task
//! as [`ConsoleCommand`]s. Replies come back on oneshot channels.

use std::io::BufRead;

use tokio::sync::{mpsc, oneshot};

use gocwatch::engine::{ConsoleCommand, WatchStatus};

/// Help text printed at startup and by `help`.
pub const HELP: &str = "\
Commands:
  telex <CALLSIGN> <MESSAGE...>   send TELEX
  ping <CALLSIGN>                 send test TELEX
  status                          show watcher state
  help                            show help
  quit | exit                     stop the watcher";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Empty,
    Help,
    Status,
    Quit,
    Telex { to: String, text: String },
    Ping { to: String },
    /// Known command with missing arguments; carries the usage line.
    Usage(&'static str),
    Unknown(String),
}

/// Parse one console line.
pub fn parse_line(line: &str) -> ConsoleInput {
    let line = line.trim();
    if line.is_empty() {
        return ConsoleInput::Empty;
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_lowercase().as_str() {
        "help" | "?" => ConsoleInput::Help,
        "status" => ConsoleInput::Status,
        "quit" | "exit" => ConsoleInput::Quit,
        "ping" => match rest.split_whitespace().next() {
            Some(to) => ConsoleInput::Ping {
                to: to.to_uppercase(),
            },
            None => ConsoleInput::Usage("Usage: ping <CALLSIGN>"),
        },
        "telex" => match rest.split_once(char::is_whitespace) {
            Some((to, text)) if !text.trim().is_empty() => ConsoleInput::Telex {
                to: to.to_uppercase(),
                text: text.trim().to_string(),
            },
            _ => ConsoleInput::Usage("Usage: telex <CALLSIGN> <MESSAGE>"),
        },
        other => ConsoleInput::Unknown(other.to_string()),
    }
}

/// Read stdin until `quit`, end of input or Ctrl-C, then ask the watcher to stop.
pub async fn run_console(commands: mpsc::Sender<ConsoleCommand>) {
    let mut lines = spawn_stdin_reader();

    loop {
        let line = tokio::select! {
            line = lines.recv() => line,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let Some(line) = line else {
            break;
        };

        match parse_line(&line) {
            ConsoleInput::Empty => {}
            ConsoleInput::Help => println!("{}", HELP),
            ConsoleInput::Quit => break,
            ConsoleInput::Usage(usage) => println!("{}", usage),
            ConsoleInput::Unknown(_) => println!("Unknown command. Type 'help'."),
            ConsoleInput::Status => {
                let (reply, response) = oneshot::channel();
                if commands.send(ConsoleCommand::Status { reply }).await.is_err() {
                    break;
                }
                if let Ok(status) = response.await {
                    print_status(&status);
                }
            }
            ConsoleInput::Ping { to } => {
                let (reply, response) = oneshot::channel();
                let command = ConsoleCommand::Ping {
                    to: to.clone(),
                    reply,
                };
                if commands.send(command).await.is_err() {
                    break;
                }
                match response.await {
                    Ok(Ok(ack)) => println!("Ping sent to {} (ok: {})", to, ack),
                    Ok(Err(e)) => println!("Ping failed to {}: {}", to, e),
                    Err(_) => break,
                }
            }
            ConsoleInput::Telex { to, text } => {
                let (reply, response) = oneshot::channel();
                let command = ConsoleCommand::Telex {
                    to: to.clone(),
                    text,
                    reply,
                };
                if commands.send(command).await.is_err() {
                    break;
                }
                match response.await {
                    Ok(Ok(ack)) => println!("TELEX sent to {} (ok: {})", to, ack),
                    Ok(Err(e)) => println!("TELEX failed to {}: {}", to, e),
                    Err(_) => break,
                }
            }
        }
    }

    println!("Exiting...");
    let _ = commands.send(ConsoleCommand::Shutdown).await;
}

/// Stdin is read on a dedicated thread so a pending read never blocks shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Console input error");
                    break;
                }
            }
        }
    });
    rx
}

fn print_status(status: &WatchStatus) {
    println!("Cycles:        {}", status.cycles);
    println!("Airports:      {}", status.airports.join(", "));
    println!("Sent flags:    {}", status.fired_flags);
    println!("Slot tracking: {}", status.tracked_slots);
    println!(
        "Flight feed:   {}",
        if status.feed_failing { "failing" } else { "ok" }
    );
    if let Some(report) = &status.last_cycle {
        if report.feed_ok {
            println!(
                "Last cycle:    {} flights, {} sent, {} failed, {} slot tables unavailable",
                report.flights,
                report.dispatched(),
                report.delivery_failures,
                report.slot_failures
            );
        } else {
            println!("Last cycle:    flight feed unavailable");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_line("   "), ConsoleInput::Empty);
        assert_eq!(parse_line("HELP"), ConsoleInput::Help);
        assert_eq!(parse_line("status"), ConsoleInput::Status);
        assert_eq!(parse_line("exit"), ConsoleInput::Quit);
        assert_eq!(parse_line("quit"), ConsoleInput::Quit);
    }

    #[test]
    fn test_parse_telex() {
        assert_eq!(
            parse_line("telex hpf123  CLEARED TO PUSH\tFACING EAST "),
            ConsoleInput::Telex {
                to: "HPF123".to_string(),
                text: "CLEARED TO PUSH\tFACING EAST".to_string(),
            }
        );
        assert!(matches!(parse_line("telex HPF123"), ConsoleInput::Usage(_)));
        assert!(matches!(parse_line("telex"), ConsoleInput::Usage(_)));
    }

    #[test]
    fn test_parse_ping() {
        assert_eq!(
            parse_line("ping hpf7"),
            ConsoleInput::Ping {
                to: "HPF7".to_string()
            }
        );
        assert!(matches!(parse_line("ping"), ConsoleInput::Usage(_)));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_line("launch HPF1"),
            ConsoleInput::Unknown("launch".to_string())
        );
    }
}
