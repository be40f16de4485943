//! ACS Contraindication Checklist — Demo CLI
//!
//! Runs one or all of the checklist scenarios. Each scenario uses the real
//! store, persistence adapter, verifier and embedded catalog, wired to an
//! in-memory slot and a clock fixed at 14:05:30.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- administer
//!   cargo run -p demo -- reset --yes

mod scenarios;

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use acscheck_contracts::error::ChecklistResult;

use scenarios::ScenarioReport;

// ── CLI definition ────────────────────────────────────────────────────────────

/// ACS contraindication checklist demo.
///
/// Each subcommand runs one or all of the checklist scenarios, showing the
/// gating, locking, fallback, and reset behavior of the store.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "ACS contraindication checklist demo",
    long_about = "Runs checklist scenarios showing checklist gating, the administration\n\
                  lock, corrupted-storage fallback, and confirmation-gated reset."
)]
struct Cli {
    /// Answer yes to the reset confirmation instead of prompting.
    #[arg(long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all five scenarios in sequence.
    RunAll,
    /// Scenario 1: start with no durable slot.
    FreshStart,
    /// Scenario 2: clear every aspirin check, record, then try to untick.
    Administer,
    /// Scenario 3: record NTG with one check still open.
    Incomplete,
    /// Scenario 4: start from a slot holding non-JSON text.
    CorruptSlot,
    /// Scenario 5: reset after administration, behind a confirmation.
    Reset,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    debug!(assume_yes = cli.yes, "demo starting");

    print_banner();

    let mut confirm = |question: &str| cli.yes || prompt_yes_no(question);

    let result = match cli.command {
        Command::RunAll => run_all(&mut confirm),
        Command::FreshStart => scenarios::fresh_start().map(|r| vec![r]),
        Command::Administer => scenarios::administer().map(|r| vec![r]),
        Command::Incomplete => scenarios::incomplete().map(|r| vec![r]),
        Command::CorruptSlot => scenarios::corrupt_slot().map(|r| vec![r]),
        Command::Reset => scenarios::reset(&mut confirm).map(|r| vec![r]),
    };

    match result {
        Ok(reports) => {
            let failed: Vec<&str> = reports.iter().filter(|r| !r.passed).map(|r| r.name).collect();
            if failed.is_empty() {
                println!("All selected scenarios completed successfully.");
            } else {
                eprintln!("Scenarios with failed expectations: {}", failed.join(", "));
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all(confirm: &mut dyn FnMut(&str) -> bool) -> ChecklistResult<Vec<ScenarioReport>> {
    Ok(vec![
        scenarios::fresh_start()?,
        scenarios::administer()?,
        scenarios::incomplete()?,
        scenarios::corrupt_slot()?,
        scenarios::reset(confirm)?,
    ])
}

// ── Confirmation prompt ───────────────────────────────────────────────────────

/// Ask `question` on stdout and read a y/n answer from stdin. Anything other
/// than "y"/"yes" (including EOF or a read error) counts as no.
fn prompt_yes_no(question: &str) -> bool {
    print!("  {} [y/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("ACS Contraindication Checklist");
    println!("Scenario Demo");
    println!("==============================");
    println!();
    println!("Per drug:");
    println!("  [1] Every contraindication check must be cleared");
    println!("  [2] Only then can the administration time be recorded (HH:MM:SS)");
    println!("  [3] Once recorded, the checklist is locked; the first time wins");
    println!("  [4] Every change is written through to the durable slot");
    println!("  [5] A corrupted slot falls back to a fresh checklist; reset needs confirmation");
    println!();
}
