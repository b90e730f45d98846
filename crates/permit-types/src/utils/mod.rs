//! Utility functions for hex parsing, formatting and EIP-712 encoding.

pub mod conversion;
pub mod eip712;
pub mod formatting;

pub use conversion::{
	parse_address, parse_b256, parse_bytes, parse_chain_id, parse_fixed_hex, parse_u256,
	ConversionError,
};
pub use eip712::{
	compute_final_digest, Eip712AbiEncoder, DOMAIN_TYPE, DOMAIN_TYPE_HASH, EIP712_PREFIX,
	PERMIT_TYPE, PERMIT_TYPE_HASH, TRANSFER_WITH_AUTHORIZATION_TYPE,
	TRANSFER_WITH_AUTHORIZATION_TYPE_HASH,
};
pub use formatting::{truncate_hex, without_0x_prefix};

/// Current UNIX timestamp in seconds, or 0 if the clock is before the epoch.
pub fn current_timestamp() -> u64 {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or(0)
}
