//! Noleggio administration CLI.
//!
//! Server-side chores that have no place behind the HTTP API: creating
//! tenants, issuing and revoking API tokens, and provisioning the
//! restricted database role the API connects with.

use std::process;

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() {
    let _env = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = cli.run().await {
        eprintln!("{error}");
        process::exit(1);
    }
}
