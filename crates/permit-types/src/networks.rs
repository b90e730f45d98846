//! Network configuration types for the bridged token deployments.
//!
//! Each network lists the permit-capable tokens deployed on it together with
//! the EIP-712 name and version their contracts report.

use crate::Eip712Domain;
use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Which rollup stack (or L1) a network belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
	Ethereum,
	Optimism,
	Arbitrum,
	Zksync,
}

/// A permit-capable token deployment.
///
/// # Fields
///
/// * `symbol` - Lookup key, e.g. "stETH" or "wstETH"
/// * `name` - EIP-712 domain name as returned by the contract
/// * `version` - EIP-712 domain version
/// * `address` - The token contract, used as `verifyingContract`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct TokenConfig {
	pub symbol: String,
	pub name: String,
	pub version: String,
	pub address: Address,
}

impl TokenConfig {
	/// The EIP-712 domain of this token on the given chain.
	pub fn domain(&self, chain_id: u64) -> Eip712Domain {
		Eip712Domain::new(&self.name, &self.version, chain_id, self.address)
	}
}

/// Configuration for a single network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	pub name: String,
	pub layer: Layer,
	#[serde(default)]
	pub tokens: Vec<TokenConfig>,
}

impl NetworkConfig {
	/// Case-insensitive token lookup by symbol.
	pub fn token(&self, symbol: &str) -> Option<&TokenConfig> {
		self.tokens
			.iter()
			.find(|t| t.symbol.eq_ignore_ascii_case(symbol))
	}
}

/// Networks keyed by chain id.
pub type NetworksConfig = HashMap<u64, NetworkConfig>;

/// Deserializes networks whose chain ids are TOML string keys into `u64` keys.
pub fn deserialize_networks<'de, D>(deserializer: D) -> Result<NetworksConfig, D::Error>
where
	D: Deserializer<'de>,
{
	let string_map: HashMap<String, NetworkConfig> = HashMap::deserialize(deserializer)?;
	let mut result = HashMap::new();

	for (key, value) in string_map {
		let chain_id = key
			.parse::<u64>()
			.map_err(|e| serde::de::Error::custom(format!("Invalid chain_id '{}': {}", key, e)))?;
		result.insert(chain_id, value);
	}

	Ok(result)
}
