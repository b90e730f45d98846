//! String formatting utilities.
//!
//! Hex prefix stripping and shortening of long hex values for log output.

/// Shortens a hex string for logs: `0x1234abcd..ef01`.
///
/// Strings of 14 characters or fewer are returned unchanged.
pub fn truncate_hex(value: &str) -> String {
	if value.len() <= 14 {
		value.to_string()
	} else {
		format!("{}..{}", &value[..10], &value[value.len() - 4..])
	}
}

/// Removes "0x" or "0X" prefix from a hex string if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}
