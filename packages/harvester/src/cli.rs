//! Command-line interface for the harvester.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{validate_source_url, BIC_ARCHIVE_URL, DEFAULT_STAGING_DIR};
use crate::error::Result;
use crate::harvester::{harvest, ArchiveSource};

/// BIC directory harvester - Download and flatten the Bank of Russia BIC directory.
#[derive(Parser)]
#[command(name = "bic-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download the current directory archive and flatten it to JSON records.
    Harvest {
        /// Archive URL (default: the Bank of Russia publication URL)
        #[arg(short, long)]
        url: Option<String>,

        /// Staging directory for the archive and the extracted document
        #[arg(short, long)]
        staging_dir: Option<PathBuf>,

        /// Write the records to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Harvest {
            url,
            staging_dir,
            output,
        } => harvest_command(url.as_deref(), staging_dir, output.as_deref()),
    }
}

/// Execute the harvest command.
fn harvest_command(
    url: Option<&str>,
    staging_dir: Option<PathBuf>,
    output: Option<&std::path::Path>,
) -> Result<()> {
    let url = url.unwrap_or(BIC_ARCHIVE_URL);
    let staging_dir = staging_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_STAGING_DIR));

    // Validate before making HTTP requests
    validate_source_url(url)?;

    eprintln!(
        "{} {}",
        style("Harvesting").bold(),
        style(url).cyan()
    );

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Downloading and flattening directory...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let source = ArchiveSource::new(url, staging_dir);
    let records = match harvest(&source) {
        Ok(records) => records,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_and_clear();

    eprintln!("  Records: {}", style(records.len()).green());

    // Hand the record list to the external store as JSON.
    let json = serde_json::to_string_pretty(&records)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            eprintln!(
                "{} {}",
                style("Saved to:").green().bold(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
