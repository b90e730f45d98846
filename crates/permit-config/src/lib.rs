//! Configuration for the permit toolkit.
//!
//! Describes the networks and permit-capable tokens the scripts work with,
//! the signer used for signing, and default lifetimes for signed messages.
//! Configuration is TOML with `${VAR}` / `${VAR:-default}` interpolation.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["file1.toml", "file2.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

#[cfg(feature = "testing")]
pub mod builders {
	pub mod config;
}
mod loader;

use permit_types::{deserialize_networks, Eip712Domain, NetworksConfig, TokenConfig};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Configuration error: {0}")]
	Parse(String),
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message, drop the echoed input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	/// Defaults applied when a command leaves a deadline or window open.
	#[serde(default)]
	pub permit: PermitConfig,
	/// Networks keyed by chain id.
	#[serde(deserialize_with = "deserialize_networks")]
	pub networks: NetworksConfig,
	/// Signer selection. Only required by signing commands.
	pub signer: Option<SignerConfig>,
}

/// Lifetimes for freshly signed messages, in seconds from now.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PermitConfig {
	#[serde(default = "default_deadline_seconds")]
	pub deadline_seconds: u64,
	#[serde(default = "default_authorization_validity_seconds")]
	pub authorization_validity_seconds: u64,
}

impl Default for PermitConfig {
	fn default() -> Self {
		Self {
			deadline_seconds: default_deadline_seconds(),
			authorization_validity_seconds: default_authorization_validity_seconds(),
		}
	}
}

fn default_deadline_seconds() -> u64 {
	3600
}

fn default_authorization_validity_seconds() -> u64 {
	3600
}

/// Which signer implementation to use and how each one is configured.
#[derive(Clone, Deserialize, Serialize)]
pub struct SignerConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of signer implementation names to their raw TOML tables.
	pub implementations: HashMap<String, toml::Value>,
}

/// Implementation tables hold key material, so only their names are shown.
impl fmt::Debug for SignerConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<&String> = self.implementations.keys().collect();
		names.sort();
		f.debug_struct("SignerConfig")
			.field("primary", &self.primary)
			.field("implementations", &names)
			.finish()
	}
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)))
				},
			},
		};

		result.push_str(&input[last..full_match.start()]);
		result.push_str(&value);
		last = full_match.end();
	}
	result.push_str(&input[last..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
		let file_name = path.file_name().ok_or_else(|| {
			ConfigError::Validation(format!("Invalid path: {}", path.display()))
		})?;

		let mut loader = loader::ConfigLoader::new(base_dir);
		loader.load_config(file_name).await
	}

	/// Looks up a token by chain id and symbol.
	pub fn token(&self, chain_id: u64, symbol: &str) -> Result<&TokenConfig, ConfigError> {
		let network = self.networks.get(&chain_id).ok_or_else(|| {
			ConfigError::Validation(format!("Network {} not found in configuration", chain_id))
		})?;
		network.token(symbol).ok_or_else(|| {
			ConfigError::Validation(format!(
				"Token '{}' not configured on network {} ({})",
				symbol, chain_id, network.name
			))
		})
	}

	/// The EIP-712 domain of a configured token.
	pub fn domain(&self, chain_id: u64, symbol: &str) -> Result<Eip712Domain, ConfigError> {
		self.token(chain_id, symbol).map(|token| token.domain(chain_id))
	}

	/// Name and table of the primary signer implementation.
	pub fn primary_signer(&self) -> Result<(&str, &toml::Value), ConfigError> {
		let signer = self
			.signer
			.as_ref()
			.ok_or_else(|| ConfigError::Validation("No [signer] section configured".into()))?;
		let table = signer.implementations.get(&signer.primary).ok_or_else(|| {
			ConfigError::Validation(format!(
				"Primary signer '{}' not found in implementations",
				signer.primary
			))
		})?;
		Ok((signer.primary.as_str(), table))
	}

	/// Checks cross-field constraints serde cannot express.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"Networks configuration cannot be empty".into(),
			));
		}

		for (chain_id, network) in &self.networks {
			if network.name.is_empty() {
				return Err(ConfigError::Validation(format!(
					"Network {} must have a name",
					chain_id
				)));
			}
			if network.tokens.is_empty() {
				return Err(ConfigError::Validation(format!(
					"Network {} must have at least 1 token configured",
					chain_id
				)));
			}

			let mut symbols = HashSet::new();
			for token in &network.tokens {
				if token.name.is_empty() || token.version.is_empty() {
					return Err(ConfigError::Validation(format!(
						"Token '{}' on network {} must have an EIP-712 name and version",
						token.symbol, chain_id
					)));
				}
				if !symbols.insert(token.symbol.to_lowercase()) {
					return Err(ConfigError::Validation(format!(
						"Duplicate token '{}' on network {}",
						token.symbol, chain_id
					)));
				}
			}
		}

		if self.permit.deadline_seconds == 0 {
			return Err(ConfigError::Validation(
				"permit.deadline_seconds must be greater than 0".into(),
			));
		}
		if self.permit.authorization_validity_seconds == 0 {
			return Err(ConfigError::Validation(
				"permit.authorization_validity_seconds must be greater than 0".into(),
			));
		}

		if self.signer.is_some() {
			self.primary_signer()?;
		}

		Ok(())
	}
}

/// Parses a TOML string, resolving environment variables and validating.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Config::from_resolved(&resolve_env_vars(s)?)
	}
}

impl Config {
	/// Parses and validates TOML whose environment variables are already resolved.
	pub(crate) fn from_resolved(resolved: &str) -> Result<Self, ConfigError> {
		let config: Config = toml::from_str(resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	const BASE: &str = r#"
[networks.1]
name = "eth_mainnet"
layer = "ethereum"
[[networks.1.tokens]]
symbol = "stETH"
name = "Liquid staked Ether 2.0"
version = "2"
address = "0xae7ab96520DE3A18E5e111B5EaAb095312D7fE84"

[networks.10]
name = "opt_mainnet"
layer = "optimism"
[[networks.10.tokens]]
symbol = "wstETH"
name = "Wrapped liquid staked Ether 2.0"
version = "1"
address = "0x1F32b1c2345538c0c6f582fCB022739c4A194Ebb"
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("PERMIT_TEST_HOST", "localhost");
		std::env::set_var("PERMIT_TEST_PORT", "8545");

		let input = "rpc = \"http://${PERMIT_TEST_HOST}:${PERMIT_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "rpc = \"http://localhost:8545\"");

		std::env::remove_var("PERMIT_TEST_HOST");
		std::env::remove_var("PERMIT_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${PERMIT_MISSING_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let result = resolve_env_vars("value = \"${PERMIT_MISSING_VAR}\"");
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("PERMIT_MISSING_VAR"));
	}

	#[test]
	fn test_parse_and_lookup_domain() {
		let config: Config = BASE.parse().unwrap();

		assert_eq!(config.permit, PermitConfig::default());
		let domain = config.domain(1, "steth").unwrap();
		assert_eq!(domain.name, "Liquid staked Ether 2.0");
		assert_eq!(domain.version, "2");
		assert_eq!(
			domain.verifying_contract,
			address!("ae7ab96520DE3A18E5e111B5EaAb095312D7fE84")
		);

		assert!(config.domain(10, "stETH").is_err());
		assert!(config.domain(42161, "wstETH").is_err());
	}

	#[test]
	fn test_signer_with_env_key() {
		std::env::set_var(
			"PERMIT_TEST_PRIVATE_KEY",
			"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
		);
		let config_str = format!(
			"{}\n{}",
			BASE,
			r#"
[signer]
primary = "local"
[signer.implementations.local]
private_key = "${PERMIT_TEST_PRIVATE_KEY}"
"#
		);

		let config: Config = config_str.parse().unwrap();
		let (name, table) = config.primary_signer().unwrap();
		assert_eq!(name, "local");
		assert!(table.get("private_key").is_some());

		let printed = format!("{:?}", config);
		assert!(printed.contains("local"));
		assert!(!printed.contains("ac0974bec39a17e3"));

		std::env::remove_var("PERMIT_TEST_PRIVATE_KEY");
	}

	#[test]
	fn test_unknown_primary_signer_rejected() {
		let config_str = format!(
			"{}\n{}",
			BASE,
			r#"
[signer]
primary = "kms"
[signer.implementations.local]
private_key = "0x01"
"#
		);
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(err.to_string().contains("Primary signer 'kms' not found"));
	}

	#[test]
	fn test_missing_signer_section() {
		let config: Config = BASE.parse().unwrap();
		let err = config.primary_signer().unwrap_err();
		assert!(err.to_string().contains("No [signer] section"));
	}

	#[test]
	fn test_duplicate_token_rejected() {
		let config_str = format!(
			"{}\n{}",
			BASE,
			r#"
[[networks.1.tokens]]
symbol = "STETH"
name = "Liquid staked Ether 2.0"
version = "2"
address = "0xae7ab96520DE3A18E5e111B5EaAb095312D7fE84"
"#
		);
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(err.to_string().contains("Duplicate token 'STETH' on network 1"));
	}

	#[test]
	fn test_empty_version_rejected() {
		let config_str = r#"
[networks.5]
name = "eth_goerli"
layer = "ethereum"
[[networks.5.tokens]]
symbol = "stETH"
name = "Liquid staked Ether 2.0"
version = ""
address = "0x1643E812aE58766192Cf7D2Cf9567dF2C37e9B7F"
"#;
		let err = Config::from_str(config_str).unwrap_err();
		assert!(err.to_string().contains("must have an EIP-712 name and version"));
	}

	#[test]
	fn test_network_without_tokens_rejected() {
		let config_str = r#"
[networks.324]
name = "zksync_mainnet"
layer = "zksync"
"#;
		let err = Config::from_str(config_str).unwrap_err();
		assert!(err.to_string().contains("at least 1 token"));
	}

	#[test]
	fn test_zero_deadline_rejected() {
		let config_str = format!("[permit]\ndeadline_seconds = 0\n{}", BASE);
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(err.to_string().contains("deadline_seconds"));
	}

	#[test]
	fn test_invalid_address_reported() {
		let config_str = r#"
[networks.1]
name = "eth_mainnet"
layer = "ethereum"
[[networks.1.tokens]]
symbol = "stETH"
name = "Liquid staked Ether 2.0"
version = "2"
address = "0xae7ab965"
"#;
		assert!(matches!(
			Config::from_str(config_str),
			Err(ConfigError::Parse(_))
		));
	}
}
