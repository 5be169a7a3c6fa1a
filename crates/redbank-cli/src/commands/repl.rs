//! Interactive test client against one running replica.
//!
//! Grounded on the original `test-client/cmd_client.py`: a line-oriented
//! loop reading `<cmd> <aid> [<amount>]` and printing the response dict.
//! Reworked here with `rustyline` editing/history in the teacher's
//! `kimberlite-cli::commands::repl` style, but without SQL completion —
//! there's no grammar to complete beyond four command words.

use anyhow::{Context, Result};
use redbank_types::{ClientRequest, Cmd};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::parse_address;
use crate::style::SemanticStyle;

const HELP_TEXT: &str = r"
Commands:
  deposit <aid> <amount>    Deposit amount into account aid
  withdraw <aid> <amount>   Withdraw amount from account aid (red, may defer)
  interest <aid>            Accrue interest on account aid
  check <aid>               Read the current balance of account aid
  dump                      Print this replica's vector clock state
  help                      Show this help message
  exit                      Leave the REPL
";

/// Runs the interactive REPL against the replica at `server`.
pub async fn run(server: &str) -> Result<()> {
    let addr = parse_address(server)?;
    println!("{}", "redbank interactive client".header());
    println!("  {}: {addr}", "server".muted());
    println!("{}", "Type 'help' for commands, 'exit' to quit.".muted());
    println!();

    let mut rl = DefaultEditor::new().context("failed to initialize REPL editor")?;
    let history_path = history_path();
    if let Some(path) = &history_path {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline("redbank> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed).ok();
                if matches!(trimmed, "exit" | "quit") {
                    break;
                }
                if let Err(err) = execute_line(addr, trimmed).await {
                    println!("{} {err}", "error:".error());
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".muted());
                break;
            }
            Err(err) => {
                println!("{} {err}", "error:".error());
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        let _ = rl.save_history(path);
    }
    Ok(())
}

async fn execute_line(addr: std::net::SocketAddr, line: &str) -> Result<()> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["help"] => {
            println!("{HELP_TEXT}");
            Ok(())
        }
        ["dump"] => {
            let text = redbank_net::call_dump(addr).await.context("dump() call failed")?;
            println!("{text}");
            Ok(())
        }
        [cmd @ ("deposit" | "withdraw"), aid, amount] => {
            let aid: i64 = aid.parse().context("aid must be an integer")?;
            let amount: f64 = amount.parse().context("amount must be a number")?;
            let command = if *cmd == "deposit" { Cmd::Deposit } else { Cmd::Withdraw };
            run_request(addr, ClientRequest::new(command, aid, amount)).await
        }
        ["interest", aid] => {
            let aid: i64 = aid.parse().context("aid must be an integer")?;
            run_request(addr, ClientRequest::new(Cmd::Interest, aid, 0.0)).await
        }
        ["check", aid] => {
            let aid: i64 = aid.parse().context("aid must be an integer")?;
            run_request(addr, ClientRequest::new(Cmd::Check, aid, 0.0)).await
        }
        _ => {
            println!("Retry. Type 'help' for the command grammar.");
            Ok(())
        }
    }
}

async fn run_request(addr: std::net::SocketAddr, request: ClientRequest) -> Result<()> {
    let response = redbank_net::call_request(addr, request).await.context("request() call failed")?;
    println!("{}", crate::style::response_table(&addr.to_string(), &response));
    Ok(())
}

/// `~/.redbank/repl_history`, mirroring the teacher's `~/.kimberlite/repl_history`.
fn history_path() -> Option<std::path::PathBuf> {
    let home = std::env::var("HOME").ok()?;
    let dir = std::path::Path::new(&home).join(".redbank");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("repl_history"))
}
