//! Conversion utilities for strict hex and number parsing.
//!
//! Every parser here rejects input whose decoded length differs from the
//! fixed width of the target type, so a truncated address or digest can never
//! be silently zero-padded.

use super::formatting::without_0x_prefix;
use alloy_primitives::{Address, Bytes, B256, U256};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing user supplied values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
	/// The input contains characters that are not hex digits.
	#[error("Invalid hex for {field}: {message}")]
	InvalidHex { field: String, message: String },
	/// The decoded input does not have the required byte length.
	#[error("Invalid length for {field}: expected {expected} bytes, got {actual}")]
	InvalidLength {
		field: String,
		expected: usize,
		actual: usize,
	},
	/// The input is not a valid unsigned integer.
	#[error("Invalid number for {field}: {value}")]
	InvalidNumber { field: String, value: String },
}

/// Decodes a hex string of exactly `N` bytes, with or without `0x` prefix.
pub fn parse_fixed_hex<const N: usize>(
	field: &str,
	value: &str,
) -> Result<[u8; N], ConversionError> {
	let raw = hex::decode(without_0x_prefix(value.trim())).map_err(|e| {
		ConversionError::InvalidHex {
			field: field.to_string(),
			message: e.to_string(),
		}
	})?;
	<[u8; N]>::try_from(raw.as_slice()).map_err(|_| ConversionError::InvalidLength {
		field: field.to_string(),
		expected: N,
		actual: raw.len(),
	})
}

/// Parses a 20-byte address. Checksums are not enforced.
pub fn parse_address(field: &str, value: &str) -> Result<Address, ConversionError> {
	parse_fixed_hex::<20>(field, value).map(Address::from)
}

/// Parses a 32-byte value such as a digest, nonce or private key.
pub fn parse_b256(field: &str, value: &str) -> Result<B256, ConversionError> {
	parse_fixed_hex::<32>(field, value).map(B256::from)
}

/// Parses arbitrary-length hex bytes.
pub fn parse_bytes(field: &str, value: &str) -> Result<Bytes, ConversionError> {
	let trimmed = without_0x_prefix(value.trim());
	hex::decode(trimmed)
		.map(Bytes::from)
		.map_err(|e| ConversionError::InvalidHex {
			field: field.to_string(),
			message: e.to_string(),
		})
}

/// Parses a uint256 given as a decimal or `0x`-prefixed hex string.
pub fn parse_u256(field: &str, value: &str) -> Result<U256, ConversionError> {
	let trimmed = value.trim();
	if trimmed.is_empty() || trimmed.starts_with('-') {
		return Err(ConversionError::InvalidNumber {
			field: field.to_string(),
			value: value.to_string(),
		});
	}
	U256::from_str(trimmed).map_err(|_| ConversionError::InvalidNumber {
		field: field.to_string(),
		value: value.to_string(),
	})
}

/// Parses a chain id given as a decimal string.
pub fn parse_chain_id(value: &str) -> Result<u64, ConversionError> {
	value
		.trim()
		.parse::<u64>()
		.map_err(|_| ConversionError::InvalidNumber {
			field: "chain_id".to_string(),
			value: value.to_string(),
		})
}
