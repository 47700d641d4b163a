use clap::Parser;
use std::path::PathBuf;

use crate::config::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "auditcord", about = "Decode Discord guild audit logs")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/auditcord.toml")]
    pub config: String,

    /// JSON snapshot holding the guild state and the raw audit-log payload
    pub snapshot: PathBuf,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Only print the entry with this id
    #[arg(long)]
    pub entry: Option<String>,
}
