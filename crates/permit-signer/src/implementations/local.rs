//! Local private-key signer.
//!
//! Signs the raw 32-byte EIP-712 digest with secp256k1. No EIP-191 prefix
//! is applied: the digest already carries the `0x1901` typed-data prefix.

use crate::{Signer, SignerError, SignerFactory, SignerRegistry};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use permit_types::{
	utils::parse_b256, Address, ConfigSchema, Field, FieldType, ImplementationRegistry, Schema,
	SecretString, Signature, ValidationError, B256,
};
use std::fmt;

/// Externally owned account backed by an in-process private key.
#[derive(Clone)]
pub struct LocalSigner {
	inner: PrivateKeySigner,
}

impl LocalSigner {
	/// Creates a signer from a 32-byte hex key, with or without `0x`.
	pub fn new(private_key: &SecretString) -> Result<Self, SignerError> {
		let key = private_key
			.with_exposed(|raw| parse_b256("private_key", raw))
			.map_err(|e| SignerError::InvalidKey(e.to_string()))?;
		let inner = PrivateKeySigner::from_bytes(&key)
			.map_err(|e| SignerError::InvalidKey(e.to_string()))?;
		Ok(Self { inner })
	}

	pub fn from_hex(private_key: &str) -> Result<Self, SignerError> {
		Self::new(&SecretString::from(private_key))
	}

	pub fn address(&self) -> Address {
		self.inner.address()
	}

	/// Signs `digest` and returns `{v, r, s}` with `v` in {27, 28}.
	pub fn sign_digest(&self, digest: &B256) -> Result<Signature, SignerError> {
		let sig = self
			.inner
			.sign_hash_sync(digest)
			.map_err(|e| SignerError::SigningFailed(e.to_string()))?;

		Ok(Signature::from_parity(
			B256::from(sig.r().to_be_bytes::<32>()),
			B256::from(sig.s().to_be_bytes::<32>()),
			sig.v(),
		))
	}
}

impl fmt::Debug for LocalSigner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LocalSigner")
			.field("address", &self.address())
			.finish()
	}
}

/// Configuration schema for the local signer.
pub struct LocalSignerSchema;

impl ConfigSchema for LocalSignerSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("private_key", FieldType::Hex { bytes: Some(32) })],
			vec![],
		);
		schema.validate(config)
	}
}

/// Factory function to create a local signer from configuration.
///
/// Configuration parameters:
/// - `private_key`: 32-byte hex private key
pub fn create_signer(config: &toml::Value) -> Result<Signer, SignerError> {
	LocalSignerSchema
		.validate(config)
		.map_err(|e| SignerError::InvalidKey(e.to_string()))?;

	let private_key = config
		.get("private_key")
		.and_then(|v| v.as_str())
		.map(SecretString::from)
		.ok_or_else(|| SignerError::InvalidKey("private_key is required".to_string()))?;

	Ok(Signer::Eoa(LocalSigner::new(&private_key)?))
}

/// Registry for the local signer implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "local";
	type Factory = SignerFactory;

	fn factory() -> Self::Factory {
		create_signer
	}
}

impl SignerRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, keccak256};

	const HARDHAT_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	#[test]
	fn test_address_from_known_key() {
		let signer = LocalSigner::from_hex(HARDHAT_KEY).unwrap();
		assert_eq!(
			signer.address(),
			address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
		);

		// Prefix is optional
		let signer = LocalSigner::from_hex(&HARDHAT_KEY[2..]).unwrap();
		assert_eq!(
			signer.address(),
			address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
		);
	}

	#[test]
	fn test_sign_digest_shape() {
		let signer = LocalSigner::from_hex(HARDHAT_KEY).unwrap();
		let sig = signer.sign_digest(&keccak256(b"digest")).unwrap();

		assert!(sig.is_ecdsa_shaped());
		assert_eq!(sig.r.len(), 32);
		assert_eq!(sig.s.len(), 32);
	}

	#[test]
	fn test_signing_is_deterministic() {
		// RFC 6979 nonces
		let signer = LocalSigner::from_hex(HARDHAT_KEY).unwrap();
		let digest = keccak256(b"digest");
		assert_eq!(
			signer.sign_digest(&digest).unwrap(),
			signer.sign_digest(&digest).unwrap()
		);
	}

	#[test]
	fn test_invalid_keys() {
		assert!(matches!(
			LocalSigner::from_hex("0x1234"),
			Err(SignerError::InvalidKey(_))
		));
		assert!(matches!(
			LocalSigner::from_hex(&format!("0x{}", "00".repeat(32))),
			Err(SignerError::InvalidKey(_))
		));
		assert!(matches!(
			LocalSigner::from_hex(&format!("0x{}", "zz".repeat(32))),
			Err(SignerError::InvalidKey(_))
		));
	}

	#[test]
	fn test_factory_rejects_missing_key() {
		let config = toml::Value::Table(toml::map::Map::new());
		let err = create_signer(&config).unwrap_err();
		assert!(err.to_string().contains("private_key"));
	}
}
