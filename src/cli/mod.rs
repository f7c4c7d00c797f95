//! CLI module for scriptqa.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::Parser;

/// scriptqa - ask questions about a movie script
///
/// Embeds the question, retrieves the closest passages from a pre-built
/// vector index and asks an LLM to answer from them.
#[derive(Parser, Debug)]
#[command(name = "scriptqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The query text.
    pub query_text: String,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, env = "SCRIPTQA_CONFIG")]
    pub config: Option<String>,
}

impl Cli {
    /// Log filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
