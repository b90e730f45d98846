//! EIP-712 permit digest engine.
//!
//! Computes domain separators and typed-data digests for EIP-2612 `Permit`
//! and EIP-3009 `TransferWithAuthorization`, and signs them with either a
//! local key or a contract signer. All digest functions are pure; only
//! [`sign`] is async because contract signers may call out.
//!
//! ```ignore
//! let separator = domain_separator("Liquid staked Ether 2.0", "2", 1, &steth);
//! let digest = permit_digest(&owner, &spender, value, nonce, deadline, &separator);
//! let signature = sign(digest, &signer).await?;
//! assert_eq!(recover_signer(&digest, &signature)?, owner);
//! ```

use permit_signer::SignerError;
use permit_types::{Address, ConversionError, U256};
use thiserror::Error;

pub mod digest;
pub mod domain;
pub mod engine;
pub mod signing;
pub mod validity;

pub use digest::{
	authorization_digest, permit_digest, permit_request_digest, permit_struct_hash,
	transfer_authorization_digest, transfer_authorization_struct_hash,
};
pub use domain::{domain_separator, domain_separator_of, parse_domain_separator};
pub use engine::{PermitEngine, SignedAuthorization, SignedPermit};
pub use signing::{recover_signer, sign, verify_signature};
pub use validity::{check_authorization_window, check_permit_deadline};

/// Errors that can occur while building or signing permits.
#[derive(Debug, Error)]
pub enum PermitError {
	/// Malformed hex, address or number in the input.
	#[error("Invalid input: {0}")]
	InvalidInput(#[from] ConversionError),
	/// Raised by the signer, passed through unchanged.
	#[error(transparent)]
	Signer(#[from] SignerError),
	#[error("Expired: limit {limit}, now {now}")]
	Expired { limit: U256, now: U256 },
	#[error("Not yet valid: valid after {valid_after}, now {now}")]
	NotYetValid { valid_after: U256, now: U256 },
	/// No second lies strictly between `valid_after` and `valid_before`.
	#[error("Empty validity window: valid after {valid_after}, valid before {valid_before}")]
	EmptyWindow {
		valid_after: U256,
		valid_before: U256,
	},
	/// The message owner is not the configured signer.
	#[error("Signer mismatch: message owner {expected}, signer {actual}")]
	SignerMismatch { expected: Address, actual: Address },
}
