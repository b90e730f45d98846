//! Common types for the permit toolkit.
//!
//! This crate holds the data model shared by the signer, engine, config and
//! CLI crates: EIP-712 domains, permit and transfer-authorization messages,
//! signatures, network/token configuration and the low-level EIP-712 word
//! encoder.

/// EIP-712 domain fields.
pub mod domain;
/// Network and token configuration types.
pub mod networks;
/// Permit and transfer-authorization messages.
pub mod permit;
pub mod registry;
pub mod secret_string;
/// `{v, r, s}` signature container.
pub mod signature;
/// Hex parsing, formatting and EIP-712 encoding helpers.
pub mod utils;
/// Configuration validation types.
pub mod validation;

pub use domain::Eip712Domain;
pub use networks::{deserialize_networks, Layer, NetworkConfig, NetworksConfig, TokenConfig};
pub use permit::{PermitRequest, TransferAuthorization};
pub use registry::ImplementationRegistry;
pub use secret_string::SecretString;
pub use signature::Signature;
pub use utils::{without_0x_prefix, ConversionError};
pub use validation::*;

pub use alloy_primitives::{Address, Bytes, B256, U256};
