use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod render;
mod snapshot;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("auditcord=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    let mut config = config::Config::load(&args.config)?;

    // CLI --format overrides config file
    if let Some(format) = args.format {
        config.output.format = format;
    }

    let only = args
        .entry
        .as_deref()
        .map(auditcord_util::snowflake::parse_str)
        .transpose()?;

    let snapshot = snapshot::Snapshot::read(&args.snapshot)?;
    let total = snapshot.audit_log.audit_log_entries.len();
    let mut entries = snapshot.decode(config.decoder);
    if let Some(id) = only {
        entries.retain(|entry| entry.id == id);
    }
    tracing::info!(
        decoded = entries.len(),
        total,
        "Decoded audit log from {}",
        args.snapshot.display()
    );

    println!("{}", render::render(&entries, &config.output)?);
    Ok(())
}
