//! Typed-data digests for `Permit` and `TransferWithAuthorization`.
//!
//! Both follow `keccak256(0x1901 ++ domainSeparator ++ structHash)` where the
//! struct hash is the type hash followed by one 32-byte word per member, in
//! declaration order.

use permit_types::{
	utils::{
		compute_final_digest, Eip712AbiEncoder, PERMIT_TYPE_HASH,
		TRANSFER_WITH_AUTHORIZATION_TYPE_HASH,
	},
	Address, PermitRequest, TransferAuthorization, B256, U256,
};

/// `hashStruct(Permit)`.
pub fn permit_struct_hash(
	owner: &Address,
	spender: &Address,
	value: U256,
	nonce: U256,
	deadline: U256,
) -> B256 {
	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&PERMIT_TYPE_HASH)
		.push_address(owner)
		.push_address(spender)
		.push_u256(value)
		.push_u256(nonce)
		.push_u256(deadline);
	enc.hash()
}

/// EIP-712 digest of an EIP-2612 permit.
pub fn permit_digest(
	owner: &Address,
	spender: &Address,
	value: U256,
	nonce: U256,
	deadline: U256,
	domain_separator: &B256,
) -> B256 {
	let struct_hash = permit_struct_hash(owner, spender, value, nonce, deadline);
	compute_final_digest(domain_separator, &struct_hash)
}

/// [`permit_digest`] over a [`PermitRequest`].
pub fn permit_request_digest(request: &PermitRequest, domain_separator: &B256) -> B256 {
	permit_digest(
		&request.owner,
		&request.spender,
		request.value,
		request.nonce,
		request.deadline,
		domain_separator,
	)
}

/// `hashStruct(TransferWithAuthorization)`. The nonce is already a full word.
pub fn transfer_authorization_struct_hash(
	from: &Address,
	to: &Address,
	value: U256,
	valid_after: U256,
	valid_before: U256,
	nonce: &B256,
) -> B256 {
	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&TRANSFER_WITH_AUTHORIZATION_TYPE_HASH)
		.push_address(from)
		.push_address(to)
		.push_u256(value)
		.push_u256(valid_after)
		.push_u256(valid_before)
		.push_b256(nonce);
	enc.hash()
}

/// EIP-712 digest of an EIP-3009 transfer authorization.
pub fn transfer_authorization_digest(
	from: &Address,
	to: &Address,
	value: U256,
	valid_after: U256,
	valid_before: U256,
	nonce: &B256,
	domain_separator: &B256,
) -> B256 {
	let struct_hash =
		transfer_authorization_struct_hash(from, to, value, valid_after, valid_before, nonce);
	compute_final_digest(domain_separator, &struct_hash)
}

/// [`transfer_authorization_digest`] over a [`TransferAuthorization`].
pub fn authorization_digest(auth: &TransferAuthorization, domain_separator: &B256) -> B256 {
	transfer_authorization_digest(
		&auth.from,
		&auth.to,
		auth.value,
		auth.valid_after,
		auth.valid_before,
		&auth.nonce,
		domain_separator,
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::domain::domain_separator;
	use alloy_primitives::{address, b256};

	const OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
	const SPENDER: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

	fn local_separator() -> B256 {
		domain_separator(
			"Liquid staked Ether 2.0",
			"2",
			31337,
			&address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
		)
	}

	fn request() -> PermitRequest {
		PermitRequest::new(
			OWNER,
			SPENDER,
			U256::from(1_000_000_000_000_000_000u128),
			U256::ZERO,
			U256::from(1_700_000_000u64),
		)
	}

	#[test]
	fn test_permit_digest_golden_value() {
		let digest = permit_request_digest(&request(), &local_separator());
		assert_eq!(
			digest,
			b256!("d30f7c61dc77912dfa2a55aafed12b30509c1da5a291f46c48b616d630dc12ed")
		);
	}

	#[test]
	fn test_transfer_authorization_digest_golden_value() {
		let digest = transfer_authorization_digest(
			&OWNER,
			&SPENDER,
			U256::from(1_000_000_000_000_000_000u128),
			U256::ZERO,
			U256::from(1_700_000_000u64),
			&B256::repeat_byte(0x11),
			&local_separator(),
		);
		assert_eq!(
			digest,
			b256!("309a90ac8fe496eb1b18de23b94b040cf6ce1f26693beff7395579f1349b1d07")
		);
	}

	#[test]
	fn test_every_permit_field_changes_digest() {
		let separator = local_separator();
		let base = permit_request_digest(&request(), &separator);

		let variants = [
			PermitRequest {
				owner: SPENDER,
				..request()
			},
			PermitRequest {
				spender: OWNER,
				..request()
			},
			PermitRequest {
				value: U256::from(1),
				..request()
			},
			PermitRequest {
				nonce: U256::from(1),
				..request()
			},
			PermitRequest {
				deadline: U256::MAX,
				..request()
			},
		];

		for variant in &variants {
			assert_ne!(base, permit_request_digest(variant, &separator), "{:?}", variant);
		}
		assert_ne!(base, permit_request_digest(&request(), &B256::ZERO));
	}

	#[test]
	fn test_swapped_owner_and_spender_differ() {
		let separator = local_separator();
		let swapped = PermitRequest {
			owner: SPENDER,
			spender: OWNER,
			..request()
		};
		assert_ne!(
			permit_request_digest(&request(), &separator),
			permit_request_digest(&swapped, &separator)
		);
	}

	#[test]
	fn test_every_authorization_field_changes_digest() {
		let separator = local_separator();
		let auth = || {
			TransferAuthorization::new(
				OWNER,
				SPENDER,
				U256::from(5),
				U256::from(1),
				U256::from(2),
				B256::repeat_byte(0x22),
			)
		};
		let base = authorization_digest(&auth(), &separator);

		let mut flipped_nonce = B256::repeat_byte(0x22);
		flipped_nonce[31] ^= 0x01;
		let variants = [
			TransferAuthorization {
				from: SPENDER,
				..auth()
			},
			TransferAuthorization {
				to: OWNER,
				..auth()
			},
			TransferAuthorization {
				value: U256::from(6),
				..auth()
			},
			TransferAuthorization {
				valid_after: U256::ZERO,
				..auth()
			},
			TransferAuthorization {
				valid_before: U256::from(3),
				..auth()
			},
			TransferAuthorization {
				nonce: flipped_nonce,
				..auth()
			},
		];

		for variant in &variants {
			assert_ne!(base, authorization_digest(variant, &separator), "{:?}", variant);
		}
		assert_ne!(base, authorization_digest(&auth(), &B256::ZERO));
	}

	#[test]
	fn test_authorization_struct_matches_fields() {
		let auth = TransferAuthorization::new(
			OWNER,
			SPENDER,
			U256::from(5),
			U256::from(1),
			U256::from(2),
			B256::repeat_byte(0x22),
		);
		let separator = local_separator();
		assert_eq!(
			authorization_digest(&auth, &separator),
			transfer_authorization_digest(
				&OWNER,
				&SPENDER,
				U256::from(5),
				U256::from(1),
				U256::from(2),
				&B256::repeat_byte(0x22),
				&separator,
			)
		);
	}

	#[test]
	fn test_permit_and_authorization_never_collide() {
		// Same words, different type hash
		let separator = local_separator();
		let permit = permit_digest(
			&OWNER,
			&SPENDER,
			U256::from(1),
			U256::from(2),
			U256::from(3),
			&separator,
		);
		let auth = transfer_authorization_digest(
			&OWNER,
			&SPENDER,
			U256::from(1),
			U256::from(2),
			U256::from(3),
			&B256::ZERO,
			&separator,
		);
		assert_ne!(permit, auth);
	}
}
