//! Signature container shared by EOA and contract signers.

use crate::utils::{parse_bytes, ConversionError};
use alloy_primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};

/// A `{v, r, s}` signature.
///
/// ECDSA signatures carry 32-byte `r` and `s` and `v` in {27, 28}. Contract
/// (EIP-1271) signers may return components of any width, which are kept
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Signature {
	pub v: u8,
	pub r: Bytes,
	pub s: Bytes,
}

impl Signature {
	pub fn new(v: u8, r: impl Into<Bytes>, s: impl Into<Bytes>) -> Self {
		Self {
			v,
			r: r.into(),
			s: s.into(),
		}
	}

	/// Builds an ECDSA signature from 32-byte scalars and the y-parity bit.
	pub fn from_parity(r: B256, s: B256, y_parity: bool) -> Self {
		Self::new(27 + y_parity as u8, r.to_vec(), s.to_vec())
	}

	/// Parses hex components, e.g. from CLI flags or config.
	pub fn parse(v: u8, r: &str, s: &str) -> Result<Self, ConversionError> {
		Ok(Self::new(v, parse_bytes("r", r)?, parse_bytes("s", s)?))
	}

	/// Splits a 65-byte `r || s || v` blob.
	pub fn from_bytes(raw: &[u8]) -> Result<Self, ConversionError> {
		if raw.len() != 65 {
			return Err(ConversionError::InvalidLength {
				field: "signature".to_string(),
				expected: 65,
				actual: raw.len(),
			});
		}
		Ok(Self::new(raw[64], raw[..32].to_vec(), raw[32..64].to_vec()))
	}

	/// Packs as `r || s || v`.
	pub fn to_bytes(&self) -> Bytes {
		let mut out = Vec::with_capacity(self.r.len() + self.s.len() + 1);
		out.extend_from_slice(&self.r);
		out.extend_from_slice(&self.s);
		out.push(self.v);
		out.into()
	}

	/// True when the shape is a standard 65-byte Ethereum ECDSA signature.
	pub fn is_ecdsa_shaped(&self) -> bool {
		self.r.len() == 32 && self.s.len() == 32 && matches!(self.v, 27 | 28)
	}
}
