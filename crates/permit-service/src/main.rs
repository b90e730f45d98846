//! Command-line entry point for the permit toolkit.
//!
//! Computes EIP-712 domain separators and digests for permit-capable tokens
//! listed in the configuration, signs EIP-2612 permits and EIP-3009 transfer
//! authorizations with the configured signer, and recovers signers. Results
//! are printed as JSON for deployment and test scripts to consume.

use clap::Parser;
use permit_config::Config;
use permit_types::utils::current_timestamp;
use std::path::PathBuf;

mod commands;

use commands::Command;

/// Command-line arguments for the permit toolkit.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml", env = "PERMIT_CONFIG")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

/// Main entry point.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging on stderr
/// 3. Loads configuration when the command needs it
/// 4. Runs the command and prints its JSON output on stdout
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	// stdout carries the JSON result
	fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config = if args.command.needs_config() {
		let config = Config::from_file(&args.config).await?;
		tracing::info!(
			path = %args.config.display(),
			networks = config.networks.len(),
			"Loaded configuration"
		);
		Some(config)
	} else {
		None
	};

	let output = commands::execute(args.command, config.as_ref(), current_timestamp()).await?;
	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}
