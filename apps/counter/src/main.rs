//! # Slice Counter Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Slice POS Counter                                │
//! │                                                                         │
//! │  main.rs ────► parse flags, start the runtime                          │
//! │  lib.rs ─────► logging, config, storage, command loop                  │
//! │                                                                         │
//! │  stdin/stdout: operator prompt        stderr: logs                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::process::ExitCode;

use slice_counter_lib::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The actual setup is in lib.rs for better testability
    match slice_counter_lib::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("slice-counter: {}", e);
            ExitCode::FAILURE
        }
    }
}
