//! Subcommands of the `permit` binary.
//!
//! Every command produces a JSON value; `main` prints it. Commands that look
//! up a token or sign need a loaded [`Config`], `recover` does not.

use clap::{ArgGroup, Args, Subcommand};
use permit_config::{Config, ConfigError};
use permit_core::{
	check_authorization_window, check_permit_deadline, domain_separator_of, recover_signer,
	verify_signature, PermitEngine, PermitError,
};
use permit_signer::{create_signer, Signer, SignerError};
use permit_types::{
	utils::{parse_address, parse_b256, parse_bytes, parse_u256},
	Bytes, ConversionError, Eip712Domain, PermitRequest, Signature, TransferAuthorization, B256,
	U256,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced to the user by a command.
#[derive(Debug, Error)]
pub enum CommandError {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	Permit(#[from] PermitError),
	#[error(transparent)]
	Signer(#[from] SignerError),
	#[error(transparent)]
	Input(#[from] ConversionError),
	#[error("Failed to encode output: {0}")]
	Output(#[from] serde_json::Error),
	#[error("Invalid arguments: {0}")]
	Arguments(String),
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print a token's EIP-712 domain and its separator
	Domain(TokenArgs),
	/// Compute the digest of an EIP-2612 permit without signing it
	PermitDigest(PermitDigestArgs),
	/// Sign an EIP-2612 permit with the configured signer as owner
	SignPermit(SignPermitArgs),
	/// Sign an EIP-3009 transfer authorization with the configured signer as sender
	SignAuthorization(SignAuthorizationArgs),
	/// Recover the signer of a digest
	Recover(RecoverArgs),
}

impl Command {
	pub fn needs_config(&self) -> bool {
		!matches!(self, Command::Recover(_))
	}
}

/// Selects a configured token on a configured network.
#[derive(Args, Debug)]
pub struct TokenArgs {
	#[arg(long)]
	pub chain_id: u64,
	/// Token symbol, matched case-insensitively
	#[arg(long)]
	pub token: String,
}

#[derive(Args, Debug)]
pub struct PermitDigestArgs {
	#[command(flatten)]
	pub token: TokenArgs,
	#[arg(long)]
	pub owner: String,
	#[arg(long)]
	pub spender: String,
	/// Amount in base units, decimal or 0x-prefixed hex
	#[arg(long)]
	pub value: String,
	#[arg(long)]
	pub nonce: String,
	/// UNIX timestamp; defaults to now plus `permit.deadline_seconds`
	#[arg(long)]
	pub deadline: Option<String>,
}

#[derive(Args, Debug)]
pub struct SignPermitArgs {
	#[command(flatten)]
	pub token: TokenArgs,
	#[arg(long)]
	pub spender: String,
	#[arg(long)]
	pub value: String,
	/// Current permit nonce of the owner on the token contract
	#[arg(long)]
	pub nonce: String,
	#[arg(long)]
	pub deadline: Option<String>,
}

#[derive(Args, Debug)]
pub struct SignAuthorizationArgs {
	#[command(flatten)]
	pub token: TokenArgs,
	#[arg(long)]
	pub to: String,
	#[arg(long)]
	pub value: String,
	/// Defaults to 0
	#[arg(long)]
	pub valid_after: Option<String>,
	/// Defaults to now plus `permit.authorization_validity_seconds`
	#[arg(long)]
	pub valid_before: Option<String>,
	/// 32-byte hex nonce; a random one is drawn when omitted
	#[arg(long)]
	pub nonce: Option<String>,
}

/// The signature is given either packed or as separate components.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("form").required(true).args(["signature", "v"])))]
pub struct RecoverArgs {
	#[arg(long)]
	pub digest: String,
	/// Packed 65-byte `r || s || v` signature
	#[arg(long, conflicts_with_all = ["v", "r", "s"])]
	pub signature: Option<String>,
	#[arg(long, requires_all = ["r", "s"])]
	pub v: Option<u8>,
	#[arg(long, requires = "v")]
	pub r: Option<String>,
	#[arg(long, requires = "v")]
	pub s: Option<String>,
	/// Also report whether the signature recovers to this address
	#[arg(long)]
	pub expected: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DomainOutput {
	domain: Eip712Domain,
	domain_separator: B256,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DigestOutput {
	domain: Eip712Domain,
	domain_separator: B256,
	request: PermitRequest,
	digest: B256,
}

/// A signed bundle plus the packed signature and a readable expiry.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignedOutput<T: Serialize> {
	#[serde(flatten)]
	signed: T,
	packed_signature: Bytes,
	#[serde(skip_serializing_if = "Option::is_none")]
	expires_at: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecoverOutput {
	digest: B256,
	signer: permit_types::Address,
	#[serde(skip_serializing_if = "Option::is_none")]
	matches: Option<bool>,
}

/// Runs `command` at time `now` (UNIX seconds).
pub async fn execute(
	command: Command,
	config: Option<&Config>,
	now: u64,
) -> Result<Value, CommandError> {
	match (command, config) {
		(Command::Recover(args), _) => recover(args),
		(_, None) => Err(ConfigError::Validation(
			"This command requires a configuration file".into(),
		)
		.into()),
		(Command::Domain(args), Some(config)) => domain(config, args),
		(Command::PermitDigest(args), Some(config)) => permit_digest(config, args, now),
		(Command::SignPermit(args), Some(config)) => sign_permit(config, args, now).await,
		(Command::SignAuthorization(args), Some(config)) => {
			sign_authorization(config, args, now).await
		},
	}
}

fn domain(config: &Config, args: TokenArgs) -> Result<Value, CommandError> {
	let domain = config.domain(args.chain_id, &args.token)?;
	let domain_separator = domain_separator_of(&domain);

	Ok(serde_json::to_value(DomainOutput {
		domain,
		domain_separator,
	})?)
}

fn permit_digest(
	config: &Config,
	args: PermitDigestArgs,
	now: u64,
) -> Result<Value, CommandError> {
	let domain = config.domain(args.token.chain_id, &args.token.token)?;
	let domain_separator = domain_separator_of(&domain);
	let request = PermitRequest::new(
		parse_address("owner", &args.owner)?,
		parse_address("spender", &args.spender)?,
		parse_u256("value", &args.value)?,
		parse_u256("nonce", &args.nonce)?,
		deadline_or_default(args.deadline.as_deref(), now, config.permit.deadline_seconds)?,
	);
	let digest = permit_core::permit_request_digest(&request, &domain_separator);

	Ok(serde_json::to_value(DigestOutput {
		domain,
		domain_separator,
		request,
		digest,
	})?)
}

async fn sign_permit(
	config: &Config,
	args: SignPermitArgs,
	now: u64,
) -> Result<Value, CommandError> {
	let engine = engine(config, &args.token)?;
	let request = PermitRequest::new(
		engine.signer().address(),
		parse_address("spender", &args.spender)?,
		parse_u256("value", &args.value)?,
		parse_u256("nonce", &args.nonce)?,
		deadline_or_default(args.deadline.as_deref(), now, config.permit.deadline_seconds)?,
	);
	check_permit_deadline(&request, now)?;

	let expires_at = format_timestamp(request.deadline);
	let signed = engine.sign_permit(request).await?;
	tracing::info!(digest = %signed.digest, "Signed permit");

	Ok(serde_json::to_value(SignedOutput {
		packed_signature: signed.signature.to_bytes(),
		signed,
		expires_at,
	})?)
}

async fn sign_authorization(
	config: &Config,
	args: SignAuthorizationArgs,
	now: u64,
) -> Result<Value, CommandError> {
	let engine = engine(config, &args.token)?;
	let from = engine.signer().address();
	let to = parse_address("to", &args.to)?;
	let value = parse_u256("value", &args.value)?;
	let valid_after = match args.valid_after.as_deref() {
		Some(raw) => parse_u256("valid_after", raw)?,
		None => U256::ZERO,
	};
	let valid_before = deadline_or_default(
		args.valid_before.as_deref(),
		now,
		config.permit.authorization_validity_seconds,
	)?;

	let auth = match args.nonce.as_deref() {
		Some(raw) => TransferAuthorization::new(
			from,
			to,
			value,
			valid_after,
			valid_before,
			parse_b256("nonce", raw)?,
		),
		None => {
			TransferAuthorization::with_random_nonce(from, to, value, valid_after, valid_before)
		},
	};

	// Windows that open later are fine to sign now; empty or closed ones are not
	match check_authorization_window(&auth, now) {
		Ok(()) => {},
		Err(PermitError::NotYetValid { valid_after, .. }) => {
			tracing::info!(%valid_after, "Authorization becomes usable later");
		},
		Err(e) => return Err(e.into()),
	}

	let expires_at = format_timestamp(auth.valid_before);
	let signed = engine.sign_transfer_authorization(auth).await?;
	tracing::info!(
		digest = %signed.digest,
		nonce = %signed.authorization.nonce,
		"Signed authorization"
	);

	Ok(serde_json::to_value(SignedOutput {
		packed_signature: signed.signature.to_bytes(),
		signed,
		expires_at,
	})?)
}

fn recover(args: RecoverArgs) -> Result<Value, CommandError> {
	let digest = parse_b256("digest", &args.digest)?;
	let signature = match (
		args.signature.as_deref(),
		args.v,
		args.r.as_deref(),
		args.s.as_deref(),
	) {
		(Some(packed), None, None, None) => {
			Signature::from_bytes(&parse_bytes("signature", packed)?)?
		},
		(None, Some(v), Some(r), Some(s)) => Signature::parse(v, r, s)?,
		_ => {
			return Err(CommandError::Arguments(
				"expected either --signature or all of --v, --r and --s".into(),
			))
		},
	};
	let signer = recover_signer(&digest, &signature)?;
	let matches = args
		.expected
		.as_deref()
		.map(|raw| parse_address("expected", raw))
		.transpose()?
		.map(|expected| verify_signature(&digest, &signature, &expected));

	Ok(serde_json::to_value(RecoverOutput {
		digest,
		signer,
		matches,
	})?)
}

/// Builds the primary signer declared in `[signer]`.
fn build_signer(config: &Config) -> Result<Signer, CommandError> {
	let (name, table) = config.primary_signer()?;
	let signer = create_signer(name, table)?;
	tracing::info!(
		implementation = name,
		kind = signer.kind(),
		address = %signer.address(),
		"Loaded signer"
	);
	Ok(signer)
}

fn engine(config: &Config, token: &TokenArgs) -> Result<PermitEngine, CommandError> {
	let domain = config.domain(token.chain_id, &token.token)?;
	Ok(PermitEngine::new(domain, build_signer(config)?))
}

fn deadline_or_default(raw: Option<&str>, now: u64, lifetime: u64) -> Result<U256, CommandError> {
	match raw {
		Some(raw) => Ok(parse_u256("deadline", raw)?),
		None => Ok(U256::from(now.saturating_add(lifetime))),
	}
}

/// RFC 3339 rendering of a UNIX timestamp, if it fits chrono's range.
fn format_timestamp(timestamp: U256) -> Option<String> {
	let seconds = i64::try_from(u64::try_from(timestamp).ok()?).ok()?;
	chrono::DateTime::from_timestamp(seconds, 0).map(|t| t.to_rfc3339())
}
