//! EIP-712 domain description.
//!
//! The domain binds a signature to one token contract on one chain. Hashing
//! lives in `permit-core`; this module only carries and parses the fields.

use crate::utils::{parse_address, parse_chain_id, ConversionError};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// The four `EIP712Domain` members used by permit-capable tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
	pub name: String,
	pub version: String,
	pub chain_id: u64,
	pub verifying_contract: Address,
}

impl Eip712Domain {
	pub fn new(
		name: impl Into<String>,
		version: impl Into<String>,
		chain_id: u64,
		verifying_contract: Address,
	) -> Self {
		Self {
			name: name.into(),
			version: version.into(),
			chain_id,
			verifying_contract,
		}
	}

	/// Builds a domain from untyped input as found in deployment metadata.
	///
	/// Fails if the chain id is not a decimal integer or the contract is not
	/// a 20-byte hex address.
	pub fn parse(
		name: &str,
		version: &str,
		chain_id: &str,
		verifying_contract: &str,
	) -> Result<Self, ConversionError> {
		Ok(Self {
			name: name.to_string(),
			version: version.to_string(),
			chain_id: parse_chain_id(chain_id)?,
			verifying_contract: parse_address("verifying_contract", verifying_contract)?,
		})
	}
}
