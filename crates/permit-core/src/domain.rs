//! EIP-712 domain separator computation.

use crate::PermitError;
use permit_types::{
	utils::{Eip712AbiEncoder, DOMAIN_TYPE_HASH},
	Address, Eip712Domain, B256,
};

/// Computes the EIP-712 domain separator:
///
/// ```text
/// keccak256(DOMAIN_TYPE_HASH ++ keccak256(name) ++ keccak256(version)
///           ++ chainId ++ verifyingContract)
/// ```
pub fn domain_separator(
	name: &str,
	version: &str,
	chain_id: u64,
	verifying_contract: &Address,
) -> B256 {
	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&DOMAIN_TYPE_HASH)
		.push_string(name)
		.push_string(version)
		.push_u64(chain_id)
		.push_address(verifying_contract);
	enc.hash()
}

/// [`domain_separator`] over a domain description.
pub fn domain_separator_of(domain: &Eip712Domain) -> B256 {
	domain_separator(
		&domain.name,
		&domain.version,
		domain.chain_id,
		&domain.verifying_contract,
	)
}

/// [`domain_separator`] over untyped input, e.g. values read from
/// deployment metadata. Fails on a non-numeric chain id or a malformed address.
pub fn parse_domain_separator(
	name: &str,
	version: &str,
	chain_id: &str,
	verifying_contract: &str,
) -> Result<B256, PermitError> {
	let domain = Eip712Domain::parse(name, version, chain_id, verifying_contract)?;
	Ok(domain_separator_of(&domain))
}
