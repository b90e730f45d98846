//! Time-bound checks mirroring what the token contracts enforce on-chain.
//!
//! Running these before submitting saves a reverted transaction. They do not
//! look at nonces: sequencing and replay protection belong to the token.

use crate::PermitError;
use permit_types::{PermitRequest, TransferAuthorization, U256};

/// A permit is usable while `now <= deadline`.
pub fn check_permit_deadline(request: &PermitRequest, now: u64) -> Result<(), PermitError> {
	let now = U256::from(now);
	if now > request.deadline {
		tracing::warn!(deadline = %request.deadline, %now, "Permit deadline passed");
		return Err(PermitError::Expired {
			limit: request.deadline,
			now,
		});
	}
	Ok(())
}

/// A transfer authorization is usable while `valid_after < now < valid_before`.
///
/// A window with no second strictly inside it is `EmptyWindow` whatever `now`
/// is, so `NotYetValid` always means the window opens later.
pub fn check_authorization_window(
	auth: &TransferAuthorization,
	now: u64,
) -> Result<(), PermitError> {
	if auth.valid_after.saturating_add(U256::from(1)) >= auth.valid_before {
		tracing::warn!(
			valid_after = %auth.valid_after,
			valid_before = %auth.valid_before,
			"Authorization window is empty"
		);
		return Err(PermitError::EmptyWindow {
			valid_after: auth.valid_after,
			valid_before: auth.valid_before,
		});
	}

	let now = U256::from(now);
	if now <= auth.valid_after {
		tracing::warn!(valid_after = %auth.valid_after, %now, "Authorization not yet valid");
		return Err(PermitError::NotYetValid {
			valid_after: auth.valid_after,
			now,
		});
	}
	if now >= auth.valid_before {
		tracing::warn!(valid_before = %auth.valid_before, %now, "Authorization expired");
		return Err(PermitError::Expired {
			limit: auth.valid_before,
			now,
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use permit_types::{Address, B256};

	fn permit(deadline: u64) -> PermitRequest {
		PermitRequest::new(
			Address::ZERO,
			Address::ZERO,
			U256::from(1),
			U256::ZERO,
			U256::from(deadline),
		)
	}

	fn authorization(valid_after: u64, valid_before: u64) -> TransferAuthorization {
		TransferAuthorization::new(
			Address::ZERO,
			Address::ZERO,
			U256::from(1),
			U256::from(valid_after),
			U256::from(valid_before),
			B256::ZERO,
		)
	}

	#[test]
	fn test_permit_deadline_inclusive() {
		assert!(check_permit_deadline(&permit(100), 99).is_ok());
		assert!(check_permit_deadline(&permit(100), 100).is_ok());
		assert!(matches!(
			check_permit_deadline(&permit(100), 101),
			Err(PermitError::Expired { .. })
		));
	}

	#[test]
	fn test_authorization_window_is_open_interval() {
		let auth = authorization(10, 20);

		assert!(matches!(
			check_authorization_window(&auth, 10),
			Err(PermitError::NotYetValid { .. })
		));
		assert!(check_authorization_window(&auth, 11).is_ok());
		assert!(check_authorization_window(&auth, 19).is_ok());
		assert!(matches!(
			check_authorization_window(&auth, 20),
			Err(PermitError::Expired { .. })
		));
	}

	#[test]
	fn test_empty_window_never_valid() {
		for (valid_after, valid_before) in [(10, 11), (10, 10), (20, 10)] {
			let auth = authorization(valid_after, valid_before);
			for now in 0..30 {
				assert!(matches!(
					check_authorization_window(&auth, now),
					Err(PermitError::EmptyWindow { .. })
				));
			}
		}
	}

	#[test]
	fn test_inverted_window_reported_before_not_yet_valid() {
		// now is before valid_after, yet the window can never open
		let auth = authorization(1_700_007_200, 1_700_003_600);
		assert!(matches!(
			check_authorization_window(&auth, 1_700_000_000),
			Err(PermitError::EmptyWindow { .. })
		));
	}

	#[test]
	fn test_window_bounds_at_u256_max() {
		let auth = TransferAuthorization::new(
			Address::ZERO,
			Address::ZERO,
			U256::from(1),
			U256::MAX,
			U256::MAX,
			B256::ZERO,
		);
		assert!(matches!(
			check_authorization_window(&auth, u64::MAX),
			Err(PermitError::EmptyWindow { .. })
		));
	}
}
