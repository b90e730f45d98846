//! Typed-data messages signed by token holders.
//!
//! `PermitRequest` is the EIP-2612 approval intent; `TransferAuthorization`
//! is the EIP-3009 transfer intent.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// An unsigned EIP-2612 `Permit`.
///
/// The nonce is the owner's current sequential nonce as reported by the
/// token contract. Gaps and replays are the contract's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitRequest {
	pub owner: Address,
	pub spender: Address,
	pub value: U256,
	pub nonce: U256,
	/// Absolute UNIX timestamp after which the permit is rejected.
	pub deadline: U256,
}

impl PermitRequest {
	pub fn new(
		owner: Address,
		spender: Address,
		value: U256,
		nonce: U256,
		deadline: U256,
	) -> Self {
		Self {
			owner,
			spender,
			value,
			nonce,
			deadline,
		}
	}
}

/// An unsigned EIP-3009 `TransferWithAuthorization`.
///
/// Valid only while `valid_after < now < valid_before`. The nonce is an
/// opaque 32-byte value, normally random.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferAuthorization {
	pub from: Address,
	pub to: Address,
	pub value: U256,
	pub valid_after: U256,
	pub valid_before: U256,
	pub nonce: B256,
}

impl TransferAuthorization {
	pub fn new(
		from: Address,
		to: Address,
		value: U256,
		valid_after: U256,
		valid_before: U256,
		nonce: B256,
	) -> Self {
		Self {
			from,
			to,
			value,
			valid_after,
			valid_before,
			nonce,
		}
	}

	/// Same as [`TransferAuthorization::new`] with a freshly drawn random nonce.
	pub fn with_random_nonce(
		from: Address,
		to: Address,
		value: U256,
		valid_after: U256,
		valid_before: U256,
	) -> Self {
		Self::new(from, to, value, valid_after, valid_before, B256::random())
	}
}
