//! Permit engine bound to one token domain and one signer.
//!
//! Deployment and test scripts usually sign many messages for the same token
//! with the same account; the engine caches the domain separator and bundles
//! each signature with the request and digest it covers.

use crate::{
	digest::{authorization_digest, permit_request_digest},
	domain::domain_separator_of,
	signing::sign,
	PermitError,
};
use permit_signer::Signer;
use permit_types::{Eip712Domain, PermitRequest, Signature, TransferAuthorization, B256};
use serde::Serialize;

/// A permit together with its digest and signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPermit {
	pub domain: Eip712Domain,
	pub domain_separator: B256,
	pub request: PermitRequest,
	pub digest: B256,
	pub signature: Signature,
}

/// A transfer authorization together with its digest and signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedAuthorization {
	pub domain: Eip712Domain,
	pub domain_separator: B256,
	pub authorization: TransferAuthorization,
	pub digest: B256,
	pub signature: Signature,
}

pub struct PermitEngine {
	domain: Eip712Domain,
	domain_separator: B256,
	signer: Signer,
}

impl PermitEngine {
	pub fn new(domain: Eip712Domain, signer: Signer) -> Self {
		let domain_separator = domain_separator_of(&domain);
		tracing::debug!(
			name = %domain.name,
			version = %domain.version,
			chain_id = domain.chain_id,
			%domain_separator,
			"Initialized permit engine"
		);
		Self {
			domain,
			domain_separator,
			signer,
		}
	}

	pub fn domain(&self) -> &Eip712Domain {
		&self.domain
	}

	pub fn domain_separator(&self) -> B256 {
		self.domain_separator
	}

	pub fn signer(&self) -> &Signer {
		&self.signer
	}

	pub fn permit_digest(&self, request: &PermitRequest) -> B256 {
		permit_request_digest(request, &self.domain_separator)
	}

	pub fn authorization_digest(&self, auth: &TransferAuthorization) -> B256 {
		authorization_digest(auth, &self.domain_separator)
	}

	/// Signs `request`. The request's owner must be the signer's address.
	pub async fn sign_permit(&self, request: PermitRequest) -> Result<SignedPermit, PermitError> {
		self.ensure_signer(&request.owner)?;
		let digest = self.permit_digest(&request);
		let signature = sign(digest, &self.signer).await?;

		Ok(SignedPermit {
			domain: self.domain.clone(),
			domain_separator: self.domain_separator,
			request,
			digest,
			signature,
		})
	}

	/// Signs `auth`. The authorization's `from` must be the signer's address.
	pub async fn sign_transfer_authorization(
		&self,
		auth: TransferAuthorization,
	) -> Result<SignedAuthorization, PermitError> {
		self.ensure_signer(&auth.from)?;
		let digest = self.authorization_digest(&auth);
		let signature = sign(digest, &self.signer).await?;

		Ok(SignedAuthorization {
			domain: self.domain.clone(),
			domain_separator: self.domain_separator,
			authorization: auth,
			digest,
			signature,
		})
	}

	fn ensure_signer(&self, owner: &permit_types::Address) -> Result<(), PermitError> {
		let signer = self.signer.address();
		if signer != *owner {
			return Err(PermitError::SignerMismatch {
				expected: *owner,
				actual: signer,
			});
		}
		Ok(())
	}
}
