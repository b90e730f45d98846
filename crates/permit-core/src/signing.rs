//! Signing and recovery over EIP-712 digests.

use crate::PermitError;
use alloy_primitives::PrimitiveSignature;
use permit_signer::{Signer, SignerError};
use permit_types::{utils::truncate_hex, Address, Signature, B256, U256};

/// Signs `digest` with `signer`.
///
/// EOA signers produce a secp256k1 signature with `v` in {27, 28}. Contract
/// signers are delegated to and whatever they return is passed back as is,
/// errors included.
#[tracing::instrument(skip_all, fields(kind = signer.kind(), signer = %signer.address()))]
pub async fn sign(digest: B256, signer: &Signer) -> Result<Signature, PermitError> {
	let signature = match signer {
		Signer::Eoa(local) => local.sign_digest(&digest)?,
		Signer::Contract(contract) => contract.sign(digest).await?,
	};

	tracing::debug!(digest = %truncate_hex(&digest.to_string()), v = signature.v, "Signed digest");
	Ok(signature)
}

/// Recovers the address that produced an ECDSA `signature` over `digest`.
///
/// Accepts `v` in {0, 1, 27, 28} and requires 32-byte `r` and `s`.
pub fn recover_signer(digest: &B256, signature: &Signature) -> Result<Address, PermitError> {
	let y_parity = match signature.v {
		0 | 27 => false,
		1 | 28 => true,
		v => {
			return Err(SignerError::InvalidSignature(format!("unsupported v value {}", v)).into())
		},
	};
	if signature.r.len() != 32 || signature.s.len() != 32 {
		return Err(SignerError::InvalidSignature(format!(
			"expected 32-byte r and s, got {} and {}",
			signature.r.len(),
			signature.s.len()
		))
		.into());
	}

	let sig = PrimitiveSignature::new(
		U256::from_be_slice(&signature.r),
		U256::from_be_slice(&signature.s),
		y_parity,
	);
	sig.recover_address_from_prehash(digest)
		.map_err(|e| SignerError::InvalidSignature(e.to_string()).into())
}

/// True when `signature` recovers to `expected`. Malformed signatures are
/// reported as not matching.
pub fn verify_signature(digest: &B256, signature: &Signature, expected: &Address) -> bool {
	match recover_signer(digest, signature) {
		Ok(recovered) => recovered == *expected,
		Err(e) => {
			tracing::debug!(error = %e, "Signature did not recover");
			false
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::digest::{authorization_digest, permit_request_digest};
	use crate::domain::domain_separator;
	use alloy_primitives::{address, keccak256};
	use async_trait::async_trait;
	use permit_signer::{
		implementations::fixed::FixedContractSigner, ContractSignerInterface, LocalSigner,
	};
	use permit_types::{PermitRequest, TransferAuthorization};
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;

	const HARDHAT_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
	const SPENDER: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

	fn eoa() -> Signer {
		Signer::Eoa(LocalSigner::from_hex(HARDHAT_KEY).unwrap())
	}

	fn separator() -> B256 {
		domain_separator(
			"Liquid staked Ether 2.0",
			"2",
			31337,
			&address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
		)
	}

	/// Counts calls and returns a signature of unusual widths.
	struct RecordingContractSigner {
		calls: AtomicUsize,
	}

	#[async_trait]
	impl ContractSignerInterface for RecordingContractSigner {
		fn address(&self) -> Address {
			address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0")
		}

		async fn sign(&self, _digest: B256) -> Result<Signature, SignerError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(Signature::new(7, vec![0xde, 0xad], vec![0xbe; 40]))
		}
	}

	struct FailingContractSigner;

	#[async_trait]
	impl ContractSignerInterface for FailingContractSigner {
		fn address(&self) -> Address {
			Address::ZERO
		}

		async fn sign(&self, _digest: B256) -> Result<Signature, SignerError> {
			Err(SignerError::Contract("execution reverted".to_string()))
		}
	}

	#[tokio::test]
	async fn test_permit_sign_recovers_owner() {
		let signer = eoa();
		let request = PermitRequest::new(
			signer.address(),
			SPENDER,
			U256::from(10u64).pow(U256::from(18)),
			U256::ZERO,
			U256::from(1_700_000_000u64),
		);
		let digest = permit_request_digest(&request, &separator());

		let signature = sign(digest, &signer).await.unwrap();

		assert!(matches!(signature.v, 27 | 28));
		assert_eq!(recover_signer(&digest, &signature).unwrap(), request.owner);
		assert!(verify_signature(&digest, &signature, &request.owner));
		assert!(!verify_signature(&digest, &signature, &SPENDER));
	}

	#[tokio::test]
	async fn test_authorization_with_random_nonce_recovers() {
		let signer = eoa();
		let auth = TransferAuthorization::with_random_nonce(
			signer.address(),
			SPENDER,
			U256::from(1_000u64),
			U256::from(1_000u64),
			U256::from(2_000u64),
		);
		assert!(auth.valid_after < auth.valid_before);

		let digest = authorization_digest(&auth, &separator());
		let signature = sign(digest, &signer).await.unwrap();

		assert_eq!(recover_signer(&digest, &signature).unwrap(), auth.from);
	}

	#[tokio::test]
	async fn test_contract_signature_is_returned_unmodified() {
		let mock = Signature::new(
			27,
			B256::repeat_byte(0x0a).to_vec(),
			B256::repeat_byte(0x0b).to_vec(),
		);
		let signer = Signer::contract(FixedContractSigner::new(
			address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"),
			mock.clone(),
		));

		let signature = sign(keccak256(b"anything"), &signer).await.unwrap();
		assert_eq!(signature, mock);
	}

	#[tokio::test]
	async fn test_contract_signer_width_is_not_assumed() {
		let contract = Arc::new(RecordingContractSigner {
			calls: AtomicUsize::new(0),
		});
		let signer = Signer::Contract(contract.clone());

		let signature = sign(B256::ZERO, &signer).await.unwrap();

		assert_eq!(contract.calls.load(Ordering::SeqCst), 1);
		assert_eq!(signature.v, 7);
		assert_eq!(signature.r.len(), 2);
		assert_eq!(signature.s.len(), 40);
	}

	#[tokio::test]
	async fn test_contract_signer_error_propagates() {
		let signer = Signer::contract(FailingContractSigner);
		let err = sign(B256::ZERO, &signer).await.unwrap_err();

		assert!(matches!(
			err,
			PermitError::Signer(SignerError::Contract(ref msg)) if msg == "execution reverted"
		));
	}

	#[test]
	fn test_recover_rejects_bad_shapes() {
		let digest = keccak256(b"digest");

		let bad_v = Signature::new(29, vec![1u8; 32], vec![1u8; 32]);
		assert!(matches!(
			recover_signer(&digest, &bad_v),
			Err(PermitError::Signer(SignerError::InvalidSignature(_)))
		));

		let short_r = Signature::new(27, vec![1u8; 31], vec![1u8; 32]);
		assert!(recover_signer(&digest, &short_r).is_err());
		assert!(!verify_signature(&digest, &short_r, &Address::ZERO));
	}

	#[tokio::test]
	async fn test_recover_accepts_zero_one_parity() {
		let signer = eoa();
		let digest = keccak256(b"digest");
		let mut signature = sign(digest, &signer).await.unwrap();
		signature.v -= 27;

		assert_eq!(
			recover_signer(&digest, &signature).unwrap(),
			signer.address()
		);
	}
}
