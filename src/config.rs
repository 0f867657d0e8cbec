//! TOML configuration file.
//!
//! Every key is optional; command line flags take precedence.
//!
//! ```toml
//! models = "models"
//! output = "wiki"
//! include = ["vision/classification", "mnist-8"]
//! python = "/opt/venv/bin/python"
//! placeholder_max_bytes = 1024
//!
//! [[known_limitations]]
//! pattern = "is not supported in Tensorflow"
//! kind = "runtime-unsupported"
//! ```

use crate::data::markers::KnownLimitation;
use crate::ZooError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub models: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub include: Option<Vec<String>>,
    pub fetch: Option<bool>,
    pub python: Option<PathBuf>,
    pub scratch: Option<PathBuf>,
    pub placeholder_max_bytes: Option<u64>,
    /// Extra markers appended to the built-in table
    #[serde(default)]
    pub known_limitations: Vec<KnownLimitation>,
}

impl FileConfig {
    /// Load and parse a configuration file
    pub fn load(path: &Path) -> Result<Self, ZooError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ZooError::io(format!("reading {}", path.display()), e))?;
        Self::parse(&content)
            .map_err(|e| ZooError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
