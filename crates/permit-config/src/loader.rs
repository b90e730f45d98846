//! Loads configuration split across several files.
//!
//! Included files are merged at the top level; a section may only be defined
//! once across the whole set. Included files may include further files, with
//! relative paths resolved against the including file's directory. Each file
//! is read at most once, so include cycles are rejected.

use crate::{resolve_env_vars, Config, ConfigError};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Reads a root configuration file and the files it includes.
pub struct ConfigLoader {
	/// Directory relative includes are resolved against
	base_path: PathBuf,
	/// Canonical paths already read
	visited: HashSet<PathBuf>,
	/// Top-level section name to the file defining it
	owners: HashMap<String, PathBuf>,
}

impl ConfigLoader {
	pub fn new(base_path: impl AsRef<Path>) -> Self {
		Self {
			base_path: base_path.as_ref().to_path_buf(),
			visited: HashSet::new(),
			owners: HashMap::new(),
		}
	}

	/// Loads `config_path` and everything it includes, then validates the result.
	pub async fn load_config(
		&mut self,
		config_path: impl AsRef<Path>,
	) -> Result<Config, ConfigError> {
		let root_path = resolve_path(&self.base_path, config_path)?;
		tracing::debug!(path = %root_path.display(), "Loading configuration");

		let root_content = self.read(&root_path).await?;
		let mut root: toml::Value = toml::from_str(&root_content)?;
		let mut pending: VecDeque<(PathBuf, PathBuf)> = take_includes(&mut root, &root_path)?;
		if pending.is_empty() {
			return Config::from_resolved(&root_content);
		}

		if let Some(table) = root.as_table() {
			for section in table.keys() {
				self.owners.insert(section.clone(), root_path.clone());
			}
		}

		while let Some((include, including_file)) = pending.pop_front() {
			let dir = including_file.parent().unwrap_or(self.base_path.as_path());
			let path = resolve_path(dir, &include)?;
			tracing::debug!(path = %path.display(), "Including configuration file");

			let content = self.read(&path).await?;
			let mut included: toml::Value = toml::from_str(&content)?;
			pending.extend(take_includes(&mut included, &path)?);
			self.merge(&mut root, included, &path)?;
		}

		let merged = toml::to_string(&root).map_err(|e| {
			ConfigError::Parse(format!("Failed to serialize combined config: {}", e))
		})?;
		Config::from_resolved(&merged)
	}

	/// Reads a file once, with environment variables resolved.
	async fn read(&mut self, path: &Path) -> Result<String, ConfigError> {
		let canonical = path.canonicalize().map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("Cannot resolve path {}: {}", path.display(), e),
			))
		})?;
		if !self.visited.insert(canonical.clone()) {
			return Err(ConfigError::Validation(format!(
				"Circular include detected: {} was already loaded",
				canonical.display()
			)));
		}

		let content = tokio::fs::read_to_string(path).await?;
		resolve_env_vars(&content)
	}

	/// Moves the sections of `included` into `root`, refusing redefinitions.
	fn merge(
		&mut self,
		root: &mut toml::Value,
		included: toml::Value,
		source: &Path,
	) -> Result<(), ConfigError> {
		let (Some(root), toml::Value::Table(included)) = (root.as_table_mut(), included) else {
			return Ok(());
		};

		for (section, value) in included {
			if let Some(owner) = self.owners.get(&section) {
				return Err(ConfigError::Validation(format!(
					"Duplicate section '{}' found in {} and {}. \
					Each top-level section must be unique across all configuration files.",
					section,
					owner.display(),
					source.display()
				)));
			}
			self.owners.insert(section.clone(), source.to_path_buf());
			root.insert(section, value);
		}
		Ok(())
	}

}

fn resolve_path(dir: &Path, path: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
	let resolved = dir.join(path.as_ref());
	if !resolved.exists() {
		return Err(ConfigError::Io(std::io::Error::new(
			std::io::ErrorKind::NotFound,
			format!("Configuration file not found: {}", resolved.display()),
		)));
	}
	Ok(resolved)
}

/// Removes the `include` directive from `value`, pairing each target with the
/// file that named it.
fn take_includes(
	value: &mut toml::Value,
	source: &Path,
) -> Result<VecDeque<(PathBuf, PathBuf)>, ConfigError> {
	let includes = includes_of(value)?;
	if let Some(table) = value.as_table_mut() {
		table.remove("include");
	}
	Ok(includes
		.into_iter()
		.map(|include| (include, source.to_path_buf()))
		.collect())
}

/// The `include` directive: a single path or an array of paths.
fn includes_of(root: &toml::Value) -> Result<Vec<PathBuf>, ConfigError> {
	match root.get("include") {
		None => Ok(Vec::new()),
		Some(toml::Value::String(path)) => Ok(vec![PathBuf::from(path)]),
		Some(toml::Value::Array(items)) => items
			.iter()
			.map(|item| {
				item.as_str().map(PathBuf::from).ok_or_else(|| {
					ConfigError::Validation("Include array must contain only strings".into())
				})
			})
			.collect(),
		Some(_) => Err(ConfigError::Validation(
			"Include must be a string or array of strings".into(),
		)),
	}
}
