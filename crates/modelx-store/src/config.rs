//! Store options
//!
//! Loaded from TOML; every key is optional and unknown keys are rejected.
//!
//! ```toml
//! indent = 4
//! max_concurrent_io = 8
//! prune_empty_dirs = false
//! max_value_depth = 32
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::errors::{config_error, read_error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreOptions {
    /// Spaces per indentation level in written XML (0 = compact)
    pub indent: usize,
    /// Upper bound on concurrently running document reads/writes
    pub max_concurrent_io: usize,
    /// Remove directories left empty by orphan deletion
    pub prune_empty_dirs: bool,
    /// Maximum collection nesting written by commit and accepted by open
    pub max_value_depth: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            max_concurrent_io: 16,
            prune_empty_dirs: true,
            max_value_depth: 64,
        }
    }
}

impl StoreOptions {
    /// Parse options from TOML text
    ///
    /// # Errors
    /// * `InvalidInput` - malformed TOML, wrong value types or unknown keys
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| config_error(e.to_string()))
    }

    /// Read options from a TOML file
    ///
    /// # Errors
    /// * `Read` - the file cannot be read
    /// * `InvalidInput` - see [`StoreOptions::from_toml_str`]
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
        Self::from_toml_str(&text).map_err(|e| e.with_path(path))
    }

    /// Effective concurrency bound (never zero)
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_io.max(1)
    }
}
