//! Command-line interface for tictactoe_bot.

use clap::{Parser, Subcommand};

/// Tic-tac-toe on Discord message buttons
#[derive(Parser, Debug)]
#[command(name = "tictactoe_bot")]
#[command(about = "Discord interactions endpoint for tic-tac-toe games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the interactions endpoint
    Serve {
        /// Port to bind to (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// Register the /tic-tac-toe command with Discord
    RegisterCommands,
}
