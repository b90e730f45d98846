//! Contract signer that answers every digest with a configured signature.
//!
//! Test harnesses deploy an EIP-1271 mock whose `sign` returns preset
//! `{v, r, s}` values and whose `isValidSignature` accepts exactly those.
//! This implementation mirrors that contract off-chain so permit flows for
//! contract owners can be exercised without an RPC connection.

use crate::{ContractSignerInterface, Signer, SignerError, SignerFactory, SignerRegistry};
use async_trait::async_trait;
use permit_types::{
	utils::{parse_address, truncate_hex},
	Address, ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, Signature,
	ValidationError, B256,
};

/// EIP-1271 signer with a fixed response.
#[derive(Debug, Clone)]
pub struct FixedContractSigner {
	address: Address,
	signature: Signature,
}

impl FixedContractSigner {
	pub fn new(address: Address, signature: Signature) -> Self {
		Self { address, signature }
	}
}

#[async_trait]
impl ContractSignerInterface for FixedContractSigner {
	fn address(&self) -> Address {
		self.address
	}

	async fn sign(&self, digest: B256) -> Result<Signature, SignerError> {
		tracing::debug!(
			contract = %self.address,
			digest = %truncate_hex(&digest.to_string()),
			"Returning fixed contract signature"
		);
		Ok(self.signature.clone())
	}
}

/// Configuration schema for the fixed contract signer.
pub struct FixedContractSignerSchema;

impl ConfigSchema for FixedContractSignerSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("address", FieldType::Hex { bytes: Some(20) }),
				Field::new(
					"v",
					FieldType::Integer {
						min: Some(0),
						max: Some(255),
					},
				),
				Field::new("r", FieldType::Hex { bytes: None }),
				Field::new("s", FieldType::Hex { bytes: None }),
			],
			vec![],
		);
		schema.validate(config)
	}
}

/// Factory function to create a fixed contract signer from configuration.
///
/// Configuration parameters:
/// - `address`: the contract acting as owner
/// - `v`: integer 0..=255
/// - `r`, `s`: hex strings of any even length
pub fn create_signer(config: &toml::Value) -> Result<Signer, SignerError> {
	FixedContractSignerSchema
		.validate(config)
		.map_err(|e| SignerError::Implementation(e.to_string()))?;

	let address = parse_address("address", string_field(config, "address")?)
		.map_err(|e| SignerError::Implementation(e.to_string()))?;
	let v = config
		.get("v")
		.and_then(|v| v.as_integer())
		.and_then(|v| u8::try_from(v).ok())
		.ok_or_else(|| SignerError::Implementation("v must be within 0..=255".to_string()))?;
	let signature = Signature::parse(v, string_field(config, "r")?, string_field(config, "s")?)
		.map_err(|e| SignerError::Implementation(e.to_string()))?;

	Ok(Signer::contract(FixedContractSigner::new(address, signature)))
}

fn string_field<'a>(config: &'a toml::Value, name: &str) -> Result<&'a str, SignerError> {
	config
		.get(name)
		.and_then(|v| v.as_str())
		.ok_or_else(|| SignerError::Implementation(format!("{} is required", name)))
}

/// Registry for the fixed contract signer implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "fixed_contract";
	type Factory = SignerFactory;

	fn factory() -> Self::Factory {
		create_signer
	}
}

impl SignerRegistry for Registry {}
