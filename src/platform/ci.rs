//! CI provenance.
//!
//! Reads the GitHub Actions environment once per run so the report can link
//! back to the workflow run and commit that produced it. Every variable is
//! optional.

use std::env;

const DEFAULT_SERVER_URL: &str = "https://github.com";

/// A version-control ref
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitRef {
    Tag(String),
    Branch(String),
    /// Pull request merge refs and anything else
    Other(String),
}

impl GitRef {
    /// Parse `refs/tags/X`, `refs/heads/X`, or a bare branch name
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some(tag) = raw.strip_prefix("refs/tags/") {
            Some(GitRef::Tag(tag.to_string()))
        } else if let Some(branch) = raw.strip_prefix("refs/heads/") {
            Some(GitRef::Branch(branch.to_string()))
        } else if raw.starts_with("refs/") {
            Some(GitRef::Other(raw.to_string()))
        } else {
            Some(GitRef::Branch(raw.to_string()))
        }
    }

    /// Report name suffix: `(tag=X)` or `(branch=X)`
    pub fn suffix(&self) -> Option<String> {
        match self {
            GitRef::Tag(name) => Some(format!("(tag={})", sanitize(name))),
            GitRef::Branch(name) => Some(format!("(branch={})", sanitize(name))),
            GitRef::Other(_) => None,
        }
    }

    /// Human-readable form for the banner
    pub fn describe(&self) -> String {
        match self {
            GitRef::Tag(name) => format!("tag `{}`", name),
            GitRef::Branch(name) => format!("branch `{}`", name),
            GitRef::Other(name) => format!("ref `{}`", name),
        }
    }
}

/// Branch names may contain `/`, which cannot appear in a file name
fn sanitize(name: &str) -> String {
    name.replace(['/', '\\'], "-")
}

/// Where this report came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    pub server_url: Option<String>,
    pub repository: Option<String>,
    pub commit: Option<String>,
    pub run_id: Option<String>,
    pub git_ref: Option<GitRef>,
}

impl Provenance {
    /// Read from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read through an arbitrary variable lookup (for testing)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Provenance {
            server_url: get("GITHUB_SERVER_URL"),
            repository: get("GITHUB_REPOSITORY"),
            commit: get("GITHUB_SHA"),
            run_id: get("GITHUB_RUN_ID"),
            git_ref: get("GITHUB_REF").as_deref().and_then(GitRef::parse),
        }
    }

    fn server(&self) -> &str {
        self.server_url
            .as_deref()
            .unwrap_or(DEFAULT_SERVER_URL)
            .trim_end_matches('/')
    }

    /// Link to the workflow run
    pub fn run_url(&self) -> Option<String> {
        let repo = self.repository.as_deref()?;
        let run_id = self.run_id.as_deref()?;
        Some(format!("{}/{}/actions/runs/{}", self.server(), repo, run_id))
    }

    /// Link to the commit under test
    pub fn commit_url(&self) -> Option<String> {
        let repo = self.repository.as_deref()?;
        let commit = self.commit.as_deref()?;
        Some(format!("{}/{}/commit/{}", self.server(), repo, commit))
    }

    pub fn short_commit(&self) -> Option<&str> {
        self.commit.as_deref().map(|c| c.get(..7).unwrap_or(c))
    }
}
