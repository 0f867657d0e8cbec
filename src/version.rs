//! Version and build information.
//!
//! Provides version, git commit, and build metadata.

use std::fmt;

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub build_date: Option<&'static str>,
    pub target: &'static str,
    pub rustc_version: Option<&'static str>,
    /// `package.repository` from Cargo.toml, empty when unset
    pub repository: &'static str,
}

impl BuildInfo {
    /// Link to the source revision this binary was built from
    pub fn source_url(&self) -> Option<String> {
        let commit = self.commit?;
        if self.repository.is_empty() {
            return None;
        }
        Some(format!(
            "{}/tree/{}",
            self.repository.trim_end_matches('/'),
            commit
        ))
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "zoo-status {}", self.version)?;

        if let Some(commit) = self.commit {
            writeln!(f, "Commit: {}", commit)?;
        }

        if let Some(date) = self.build_date {
            writeln!(f, "Built: {}", date)?;
        }

        writeln!(f, "Target: {}", self.target)?;

        if let Some(rustc) = self.rustc_version {
            write!(f, "Rustc: {}", rustc)?;
        }

        Ok(())
    }
}

/// Get build information
pub fn get_build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("ZOO_STATUS_GIT_HASH"),
        build_date: option_env!("ZOO_STATUS_BUILD_DATE"),
        target: env!("TARGET"),
        rustc_version: option_env!("ZOO_STATUS_RUSTC_VERSION"),
        repository: env!("CARGO_PKG_REPOSITORY"),
    }
}
