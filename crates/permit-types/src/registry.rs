//! Registry trait for self-registering implementations.

/// Base trait for implementation registries.
///
/// Each signer implementation module provides a `Registry` struct that
/// declares the name used under `[signer.implementations.<name>]` and the
/// factory that builds it from that table.
pub trait ImplementationRegistry {
	/// The configuration key, e.g. "local" or "fixed_contract".
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	fn factory() -> Self::Factory;
}
