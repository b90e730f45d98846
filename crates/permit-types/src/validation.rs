//! Configuration validation for signer implementation tables.
//!
//! Signer implementations receive a raw `toml::Value`. Before building a
//! signer the table is checked against a [`Schema`] so that a missing key or a
//! 19-byte address is reported with the offending field name.

use crate::utils::{without_0x_prefix, ConversionError};
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	#[error("Missing required field: {0}")]
	MissingField(String),
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

impl From<ConversionError> for ValidationError {
	fn from(err: ConversionError) -> Self {
		match err {
			ConversionError::InvalidHex { field, message } => {
				ValidationError::InvalidValue { field, message }
			},
			ConversionError::InvalidLength {
				field,
				expected,
				actual,
			} => ValidationError::InvalidValue {
				field,
				message: format!("expected {} bytes, got {}", expected, actual),
			},
			ConversionError::InvalidNumber { field, value } => ValidationError::InvalidValue {
				field,
				message: format!("'{}' is not a number", value),
			},
		}
	}
}

/// The type of a configuration field.
#[derive(Debug)]
pub enum FieldType {
	/// A hex string. `bytes` pins the decoded length when set.
	Hex { bytes: Option<usize> },
	Integer {
		min: Option<i64>,
		max: Option<i64>,
	},
}

/// A named field with its expected type.
#[derive(Debug)]
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
		}
	}
}

/// Required and optional fields of a TOML table.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Checks that `config` is a table, required fields exist and every
	/// present field has the declared type.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			validate_field_type(&field.name, value, &field.field_type)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				validate_field_type(&field.name, value, &field.field_type)?;
			}
		}

		Ok(())
	}
}

fn type_mismatch(field_name: &str, expected: &str, value: &toml::Value) -> ValidationError {
	ValidationError::TypeMismatch {
		field: field_name.to_string(),
		expected: expected.to_string(),
		actual: value.type_str().to_string(),
	}
}

fn validate_field_type(
	field_name: &str,
	value: &toml::Value,
	expected_type: &FieldType,
) -> Result<(), ValidationError> {
	match expected_type {
		FieldType::Hex { bytes } => {
			let raw = value
				.as_str()
				.ok_or_else(|| type_mismatch(field_name, "hex string", value))?;
			let decoded =
				hex::decode(without_0x_prefix(raw)).map_err(|e| ValidationError::InvalidValue {
					field: field_name.to_string(),
					message: e.to_string(),
				})?;
			if let Some(expected) = bytes {
				if decoded.len() != *expected {
					return Err(ConversionError::InvalidLength {
						field: field_name.to_string(),
						expected: *expected,
						actual: decoded.len(),
					}
					.into());
				}
			}
		},
		FieldType::Integer { min, max } => {
			let int_val = value
				.as_integer()
				.ok_or_else(|| type_mismatch(field_name, "integer", value))?;

			if let Some(min_val) = min {
				if int_val < *min_val {
					return Err(ValidationError::InvalidValue {
						field: field_name.to_string(),
						message: format!("Value {} is less than minimum {}", int_val, min_val),
					});
				}
			}
			if let Some(max_val) = max {
				if int_val > *max_val {
					return Err(ValidationError::InvalidValue {
						field: field_name.to_string(),
						message: format!("Value {} is greater than maximum {}", int_val, max_val),
					});
				}
			}
		},
	}

	Ok(())
}

/// A configuration schema that can validate TOML values.
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}
