use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;

mod commands;

/// Standardized exit codes for CLI.
/// 0 = OK, 2 = input error, 3 = not deployed (404), 4 = contract rejected (422), 1 = other.
const EXIT_OTHER: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_NOT_DEPLOYED: i32 = 3;
const EXIT_REJECTED: i32 = 4;

#[derive(Parser)]
#[command(
    name = "pactax",
    version,
    about = "pacta CLI — package, deploy, execute smart legal contracts"
)]
struct Cli {
    /// Dev peer URL (default: http://localhost:3000)
    #[arg(long, env = "PACTA_PEER_URL", default_value = "http://localhost:3000")]
    peer: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a template manifest JSON file into a base64 archive
    Package {
        /// Path to manifest JSON file (or - for stdin)
        #[arg(default_value = "-")]
        manifest: String,
    },
    /// Deploy a contract from a manifest, clause text, and initial state
    Deploy {
        /// Contract identifier
        contract_id: String,
        /// Path to template manifest JSON file
        manifest: String,
        /// Path to clause text file
        clause: String,
        /// Path to initial state JSON file (or - for stdin)
        #[arg(default_value = "-")]
        state: String,
    },
    /// Execute a deployed contract with a request
    Execute {
        /// Contract identifier
        contract_id: String,
        /// Path to request JSON file (or - for stdin)
        #[arg(default_value = "-")]
        request: String,
    },
    /// Show one of a contract's ledger records
    State {
        /// Contract identifier
        contract_id: String,
        /// Record to show: template, data, or state
        #[arg(long, default_value = "state")]
        record: String,
    },
    /// List events published through the peer's ledger
    Events,
    /// Check peer health
    Health,
}

/// Map error strings to exit codes based on HTTP status patterns.
fn exit_code_for(err: &str) -> i32 {
    if err.contains("HTTP 404") {
        EXIT_NOT_DEPLOYED
    } else if err.contains("HTTP 422") {
        EXIT_REJECTED
    } else if err.contains("read ") || err.contains("parse ") || err.contains("invalid ") {
        EXIT_INPUT
    } else {
        EXIT_OTHER
    }
}

fn main() {
    let cli = Cli::parse();
    let client = commands::Client::new(&cli.peer);

    let result = match cli.command {
        Commands::Package { manifest } => commands::package(&manifest),
        Commands::Deploy {
            contract_id,
            manifest,
            clause,
            state,
        } => commands::deploy(&client, &contract_id, &manifest, &clause, &state),
        Commands::Execute {
            contract_id,
            request,
        } => commands::execute(&client, &contract_id, &request),
        Commands::State {
            contract_id,
            record,
        } => commands::state(&client, &contract_id, &record),
        Commands::Events => commands::events(&client),
        Commands::Health => commands::health(&client),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(exit_code_for(&e));
    }
}
