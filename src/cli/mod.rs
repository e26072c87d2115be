//! CLI for the registration API

pub mod serve;

use clap::{Parser, Subcommand};

/// Hackathon registration backend
#[derive(Parser)]
#[command(name = "hackreg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
