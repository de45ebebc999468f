//! Entropy Reservoir CLI
//!
//! Seeds a generator from the configured source chain and prints random
//! bytes as hex.

use clap::Parser;
use entropy_reservoir::{FileConfig, GeneratorConfig};
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};
use zeroize::Zeroizing;

#[derive(Debug, Parser)]
#[command(name = "entropy-reservoir", version, about)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bytes per output line.
    #[arg(short, long, default_value_t = 32)]
    bytes: usize,

    /// Number of output lines.
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Entropy Reservoir v{}", entropy_reservoir::VERSION);

    // `process::exit` skips destructors, so every secret is dropped inside
    // `run` before exiting.
    if let Err(code) = run(&args, &mut std::io::stdout().lock()) {
        std::process::exit(code);
    }
}

/// Seeds a generator and writes `count` hex lines; returns the exit code on
/// failure.
fn run(args: &Args, out: &mut impl Write) -> Result<(), i32> {
    let config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(file) => file.generator,
            Err(e) => {
                error!("Invalid configuration: {}", e);
                return Err(2);
            }
        },
        None => GeneratorConfig::default(),
    };

    // No randomness is produced unless seeding fully succeeds.
    let rng = match config.build() {
        Ok(rng) => rng,
        Err(e) => {
            error!("Failed to seed generator: {}", e);
            return Err(1);
        }
    };

    let mut line = Zeroizing::new(vec![0u8; args.bytes]);
    for _ in 0..args.count {
        if let Err(e) = rng.fill_bytes(&mut line) {
            error!("Extraction failed: {}", e);
            return Err(1);
        }
        let hex = Zeroizing::new(line.iter().map(|b| format!("{:02x}", b)).collect::<String>());
        if let Err(e) = writeln!(out, "{}", hex.as_str()) {
            error!("Failed to write output: {}", e);
            return Err(1);
        }
    }
    Ok(())
}
