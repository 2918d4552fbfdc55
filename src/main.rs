//! amz-compare - Side-by-side Amazon product comparison CLI
//!
//! A Rust implementation with TLS fingerprint emulation for reliable scraping.

use amz_compare::amazon::regions::Region;
use amz_compare::commands::{CompareCommand, CompareOptions, NormalizeCommand, ProductCommand};
use amz_compare::comparison::Locale;
use amz_compare::config::{Config, OutputFormat};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "amz-compare",
    version,
    about = "Side-by-side Amazon product comparison CLI",
    long_about = "Compares two Amazon products spec by spec, with unit normalization, \
                  per-row verdicts and a short commentary."
)]
struct Cli {
    /// Amazon region used for bare ASINs and unknown hosts
    #[arg(short, long, global = true)]
    region: Option<Region>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "AMZ_PROXY")]
    proxy: Option<String>,

    /// Delay before each request in milliseconds
    #[arg(long, global = true)]
    delay: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Language of labels and commentary (ja, en)
    #[arg(short, long, global = true)]
    locale: Option<Locale>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two products side by side
    #[command(alias = "c")]
    Compare {
        /// Product A (URL or ASIN, or JSON file with --files)
        a: String,

        /// Product B (URL or ASIN, or JSON file with --files)
        b: String,

        /// Ask the configured advisor for a recommendation
        #[arg(long)]
        advice: bool,

        /// Explain technical specification terms
        #[arg(long)]
        explain: bool,

        /// Read both products from ProductRecord JSON files
        #[arg(long)]
        files: bool,
    },

    /// Fetch one product and print its record
    #[command(alias = "p")]
    Product {
        /// Product URL or ASIN
        input: String,
    },

    /// Show how a specification value is normalized
    Normalize {
        /// Family: size, weight, power, capacity, resolution, refresh-rate, speed
        family: String,

        /// Raw specification text
        text: String,
    },

    /// List supported regions
    Regions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr keeps stdout machine-readable)
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(region) = cli.region {
        config.region = region;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Compare { a, b, advice, explain, files } => {
            let cmd = CompareCommand::new(config);
            let options = CompareOptions { advice, explain, from_files: files };
            let output = cmd.execute(&a, &b, options).await?;
            println!("{}", output);
        }

        Commands::Product { input } => {
            let cmd = ProductCommand::new(config);
            let output = cmd.execute(&input).await?;
            println!("{}", output);
        }

        Commands::Normalize { family, text } => {
            let cmd = NormalizeCommand::new(config.format);
            let output = cmd.execute(&family, &text)?;
            println!("{}", output);
        }

        Commands::Regions => {
            println!("Supported Amazon regions:\n");
            println!("{:<6} {:<20} {:<10}", "Code", "Domain", "Currency");
            println!("{:-<6} {:-<20} {:-<10}", "", "", "");

            for region in Region::all() {
                println!(
                    "{:<6} {:<20} {:<10}",
                    region.to_string(),
                    region.domain(),
                    region.currency()
                );
            }
        }
    }

    Ok(())
}
