//! Signer model for the permit toolkit.
//!
//! A permit can be signed either by an externally owned account holding a
//! secp256k1 key, or by a smart contract that validates signatures on-chain
//! (EIP-1271). The two are modelled as the variants of [`Signer`] so callers
//! decide by matching instead of probing for capabilities.

use async_trait::async_trait;
use permit_types::{Address, ImplementationRegistry, Signature, B256};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub mod implementations {
	pub mod fixed;
	pub mod local;
}

pub use implementations::local::LocalSigner;

/// Errors that can occur during signer construction or signing.
#[derive(Debug, Error)]
pub enum SignerError {
	/// The underlying ECDSA primitive failed.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// A private key is malformed or outside the curve order.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// A signature cannot be used for recovery.
	#[error("Invalid signature: {0}")]
	InvalidSignature(String),
	/// A contract signer's `sign` entry point failed.
	#[error("Contract signer error: {0}")]
	Contract(String),
	/// Configuration or registry problems.
	#[error("Implementation error: {0}")]
	Implementation(String),
}

/// A contract account that signs through its own `sign` entry point.
///
/// Implementations decide the shape of the returned signature. Callers must
/// pass it through unchanged; the verifying token forwards it to the
/// contract's `isValidSignature`.
#[async_trait]
pub trait ContractSignerInterface: Send + Sync {
	/// The contract address that acts as permit owner.
	fn address(&self) -> Address;

	/// Produces the contract-defined signature over an EIP-712 digest.
	async fn sign(&self, digest: B256) -> Result<Signature, SignerError>;
}

/// Whoever signs a permit digest.
#[derive(Clone)]
pub enum Signer {
	/// Externally owned account with a local private key.
	Eoa(LocalSigner),
	/// EIP-1271 contract account.
	Contract(Arc<dyn ContractSignerInterface>),
}

impl Signer {
	pub fn contract(signer: impl ContractSignerInterface + 'static) -> Self {
		Signer::Contract(Arc::new(signer))
	}

	/// The address that appears as `owner` / `from` in signed messages.
	pub fn address(&self) -> Address {
		match self {
			Signer::Eoa(local) => local.address(),
			Signer::Contract(contract) => contract.address(),
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Signer::Eoa(_) => "eoa",
			Signer::Contract(_) => "contract",
		}
	}
}

impl From<LocalSigner> for Signer {
	fn from(local: LocalSigner) -> Self {
		Signer::Eoa(local)
	}
}

impl fmt::Debug for Signer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signer")
			.field("kind", &self.kind())
			.field("address", &self.address())
			.finish()
	}
}

/// Builds a signer from its `[signer.implementations.<name>]` table.
pub type SignerFactory = fn(&toml::Value) -> Result<Signer, SignerError>;

/// Registry trait for signer implementations.
pub trait SignerRegistry: ImplementationRegistry<Factory = SignerFactory> {}

/// All registered signer implementations as `(name, factory)` pairs.
pub fn get_all_implementations() -> Vec<(&'static str, SignerFactory)> {
	use implementations::{fixed, local};

	vec![
		(local::Registry::NAME, local::Registry::factory()),
		(fixed::Registry::NAME, fixed::Registry::factory()),
	]
}

/// Looks up the implementation registered as `name` and builds it.
pub fn create_signer(name: &str, config: &toml::Value) -> Result<Signer, SignerError> {
	let (_, factory) = get_all_implementations()
		.into_iter()
		.find(|(registered, _)| *registered == name)
		.ok_or_else(|| {
			SignerError::Implementation(format!("Unknown signer implementation '{}'", name))
		})?;

	let signer = factory(config)?;
	tracing::debug!(
		implementation = name,
		kind = signer.kind(),
		address = %signer.address(),
		"Created signer"
	);
	Ok(signer)
}
