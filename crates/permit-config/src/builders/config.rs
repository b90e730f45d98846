//! Configuration builder for tests and local development.
//!
//! The default configuration describes a single Hardhat network (chain id
//! 31337) with one permit token deployed at the first Hardhat contract address.

use crate::{Config, PermitConfig, SignerConfig};
use permit_types::{Address, Layer, NetworkConfig, TokenConfig};
use std::collections::HashMap;

/// Chain id of the default local network.
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// Builder for creating `Config` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	permit: PermitConfig,
	networks: HashMap<u64, NetworkConfig>,
	signer: Option<SignerConfig>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a builder holding the local network and its test token.
	pub fn new() -> Self {
		let token = TokenConfig {
			symbol: "stETH".to_string(),
			name: "Liquid staked Ether 2.0".to_string(),
			version: "2".to_string(),
			address: Address::from([
				0x5f, 0xbd, 0xb2, 0x31, 0x56, 0x78, 0xaf, 0xec, 0xb3, 0x67, 0xf0, 0x32, 0xd9, 0x3f,
				0x64, 0x2f, 0x64, 0x18, 0x0a, 0xa3,
			]),
		};
		let mut networks = HashMap::new();
		networks.insert(
			LOCAL_CHAIN_ID,
			NetworkConfig {
				name: "hardhat".to_string(),
				layer: Layer::Ethereum,
				tokens: vec![token],
			},
		);

		Self {
			permit: PermitConfig::default(),
			networks,
			signer: None,
		}
	}

	pub fn deadline_seconds(mut self, seconds: u64) -> Self {
		self.permit.deadline_seconds = seconds;
		self
	}

	pub fn authorization_validity_seconds(mut self, seconds: u64) -> Self {
		self.permit.authorization_validity_seconds = seconds;
		self
	}

	/// Adds or replaces a network.
	pub fn network(mut self, chain_id: u64, network: NetworkConfig) -> Self {
		self.networks.insert(chain_id, network);
		self
	}

	/// Uses a local private key as the primary signer.
	pub fn local_signer(mut self, private_key: &str) -> Self {
		let mut table = toml::map::Map::new();
		table.insert(
			"private_key".to_string(),
			toml::Value::String(private_key.to_string()),
		);

		let mut implementations = HashMap::new();
		implementations.insert("local".to_string(), toml::Value::Table(table));
		self.signer = Some(SignerConfig {
			primary: "local".to_string(),
			implementations,
		});
		self
	}

	/// Builds the `Config` with the configured values.
	pub fn build(self) -> Config {
		Config {
			permit: self.permit,
			networks: self.networks,
			signer: self.signer,
		}
	}
}
