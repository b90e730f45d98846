//! Generic EIP-712 utilities shared across the permit toolkit.
//!
//! These helpers provide:
//! - The type strings of the structs we sign and their type hashes
//! - Final digest computation (0x1901 || domainHash || structHash)
//! - A minimal ABI encoder for the static field types used in struct hashing

use alloy_primitives::{keccak256, Address, B256, U256};
use once_cell::sync::Lazy;

/// Two-byte prefix of every EIP-712 digest.
pub const EIP712_PREFIX: [u8; 2] = [0x19, 0x01];

pub const DOMAIN_TYPE: &str =
	"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
pub const PERMIT_TYPE: &str =
	"Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";
pub const TRANSFER_WITH_AUTHORIZATION_TYPE: &str = concat!(
	"TransferWithAuthorization(address from,address to,uint256 value,",
	"uint256 validAfter,uint256 validBefore,bytes32 nonce)"
);

/// keccak256 of [`DOMAIN_TYPE`].
pub static DOMAIN_TYPE_HASH: Lazy<B256> = Lazy::new(|| keccak256(DOMAIN_TYPE.as_bytes()));

/// keccak256 of [`PERMIT_TYPE`].
pub static PERMIT_TYPE_HASH: Lazy<B256> = Lazy::new(|| keccak256(PERMIT_TYPE.as_bytes()));

/// keccak256 of [`TRANSFER_WITH_AUTHORIZATION_TYPE`].
pub static TRANSFER_WITH_AUTHORIZATION_TYPE_HASH: Lazy<B256> =
	Lazy::new(|| keccak256(TRANSFER_WITH_AUTHORIZATION_TYPE.as_bytes()));

/// Compute the final EIP-712 digest: keccak256(0x1901 || domainHash || structHash).
pub fn compute_final_digest(domain_hash: &B256, struct_hash: &B256) -> B256 {
	let mut out = Vec::with_capacity(2 + 32 + 32);
	out.extend_from_slice(&EIP712_PREFIX);
	out.extend_from_slice(domain_hash.as_slice());
	out.extend_from_slice(struct_hash.as_slice());
	keccak256(out)
}

/// Minimal ABI encoder for static types used in EIP-712 struct hashing.
///
/// Every push appends exactly one 32-byte word. Dynamic `string` values are
/// hashed before inclusion, as EIP-712 requires.
pub struct Eip712AbiEncoder {
	buf: Vec<u8>,
}

impl Default for Eip712AbiEncoder {
	fn default() -> Self {
		Self::new()
	}
}

impl Eip712AbiEncoder {
	pub fn new() -> Self {
		Self {
			buf: Vec::with_capacity(32 * 7),
		}
	}

	pub fn push_b256(&mut self, v: &B256) -> &mut Self {
		self.buf.extend_from_slice(v.as_slice());
		self
	}

	/// Left-pads the 20 address bytes to a full word.
	pub fn push_address(&mut self, addr: &Address) -> &mut Self {
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(addr.as_slice());
		self.buf.extend_from_slice(&word);
		self
	}

	pub fn push_u256(&mut self, v: U256) -> &mut Self {
		let word: [u8; 32] = v.to_be_bytes::<32>();
		self.buf.extend_from_slice(&word);
		self
	}

	pub fn push_u64(&mut self, v: u64) -> &mut Self {
		self.push_u256(U256::from(v))
	}

	/// Encodes a `string` member as `keccak256(bytes(value))`.
	pub fn push_string(&mut self, value: &str) -> &mut Self {
		let hash = keccak256(value.as_bytes());
		self.push_b256(&hash)
	}

	/// Number of bytes encoded so far.
	pub fn len(&self) -> usize {
		self.buf.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	/// Hashes the encoded words.
	pub fn hash(&self) -> B256 {
		keccak256(&self.buf)
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}
