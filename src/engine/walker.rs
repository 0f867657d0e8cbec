//! Directory walker.
//!
//! Lazy depth-first traversal of the models root. Within a directory, files
//! are visited first (sorted by name) and subdirectories after (sorted by
//! name), so the order is stable across runs and platforms.
//!
//! A directory with a direct `model` child directory is model-bearing; the
//! walker announces it with [`WalkEvent::Section`] before any file below it.

use crate::{ModelFile, MODEL_EXTENSION};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Name of the child directory that marks a model-bearing directory
pub const MODEL_DIR_NAME: &str = "model";

/// Something found during the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    /// A model-bearing directory, relative to the root
    Section(PathBuf),
    /// An included model file
    Model(ModelFile),
}

/// Inclusion filter over relative paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionFilter {
    tokens: Vec<String>,
}

impl InclusionFilter {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        InclusionFilter {
            tokens: tokens
                .into_iter()
                .map(|t| t.trim().trim_matches('/').to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Parse a comma-separated list
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(',').map(str::to_string))
    }

    /// Whether a file (relative to the root) is included.
    ///
    /// A token matches when the path starts or ends with it, when it equals
    /// the file stem (a model id), or when it equals any path component.
    pub fn matches(&self, relative: &Path) -> bool {
        let path = crate::display_path(relative);
        let stem = relative.file_stem().map(|s| s.to_string_lossy());

        self.tokens.iter().any(|token| {
            path.starts_with(token.as_str())
                || path.ends_with(token.as_str())
                || stem.as_deref() == Some(token.as_str())
                || relative
                    .components()
                    .any(|c| c.as_os_str().to_string_lossy() == token.as_str())
        })
    }
}

/// Iterator over walk events
pub struct ModelWalker {
    root: PathBuf,
    filter: Option<InclusionFilter>,
    entries: walkdir::IntoIter,
    parent: Option<PathBuf>,
    sub_count: u32,
}

impl ModelWalker {
    pub fn new(root: &Path, filter: Option<InclusionFilter>) -> Self {
        let entries = WalkDir::new(root)
            .follow_links(false)
            .sort_by(files_first)
            .into_iter();

        ModelWalker {
            root: root.to_path_buf(),
            filter,
            entries,
            parent: None,
            sub_count: 0,
        }
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    fn model_file(&mut self, entry: &DirEntry) -> Option<ModelFile> {
        let relative = self.relative(entry.path());
        if let Some(filter) = &self.filter {
            if !filter.matches(&relative) {
                return None;
            }
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!(file = %entry.path().display(), error = %e, "cannot stat model file");
                return None;
            }
        };

        let parent = relative.parent().map(Path::to_path_buf).unwrap_or_default();
        if self.parent.as_ref() != Some(&parent) {
            self.parent = Some(parent);
            self.sub_count = 0;
        }
        self.sub_count += 1;

        Some(ModelFile {
            path: entry.path().to_path_buf(),
            relative,
            size,
            index: self.sub_count,
        })
    }
}

impl Iterator for ModelWalker {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<WalkEvent> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                if entry.path().join(MODEL_DIR_NAME).is_dir() {
                    return Some(WalkEvent::Section(self.relative(entry.path())));
                }
                continue;
            }

            if entry.file_type().is_file() && is_model_file(entry.path()) {
                if let Some(file) = self.model_file(&entry) {
                    return Some(WalkEvent::Model(file));
                }
            }
        }
    }
}

/// Walk `root`, yielding sections and included model files
pub fn walk(root: &Path, filter: Option<InclusionFilter>) -> ModelWalker {
    ModelWalker::new(root, filter)
}

pub fn is_model_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(MODEL_EXTENSION)
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}
