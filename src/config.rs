use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pajak", version, about = "Regional tax targets versus realized collections")]
pub struct Cli {
    /// SQLite database file; created and seeded on first use.
    #[arg(long, env = "PAJAK_DB", default_value = "pajak.db")]
    pub db: PathBuf,

    /// Log filter, e.g. `info` or `pajak=debug`.
    #[arg(long = "log-level", env = "PAJAK_LOG", default_value = crate::logging::DEFAULT_FILTER)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Interactive menu (the default)
    Shell,
    /// Full-screen public charts
    Dashboard {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Print or save the achievement report as CSV (admin only)
    Report {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Shell)
    }
}
