//! Temporary model trees.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zoo_status::ZooConfig;

/// A models root and an output directory inside one temp dir
pub struct ZooTree {
    dir: TempDir,
}

impl ZooTree {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(dir.path().join("models")).expect("models dir");
        std::fs::create_dir_all(dir.path().join("wiki")).expect("output dir");
        ZooTree { dir }
    }

    pub fn models(&self) -> PathBuf {
        self.dir.path().join("models")
    }

    pub fn output(&self) -> PathBuf {
        self.dir.path().join("wiki")
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file of `size` bytes under the models root
    pub fn model(&self, relative: &str, size: usize) -> PathBuf {
        let path = self.models().join(relative);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("model dir");
        std::fs::write(&path, vec![7u8; size]).expect("model file");
        path
    }

    /// Write an LFS pointer under the models root
    pub fn placeholder(&self, relative: &str) -> PathBuf {
        let path = self.models().join(relative);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("model dir");
        std::fs::write(&path, super::POINTER).expect("pointer file");
        path
    }

    /// Config pointing at this tree, fetch enabled
    pub fn config(&self) -> ZooConfig {
        ZooConfig {
            models: self.models(),
            output: self.output(),
            scratch: self.dir.path().join("model.pb"),
            ..Default::default()
        }
    }

    pub fn read_report(&self, name: &str) -> String {
        std::fs::read_to_string(self.output().join(name)).expect("report file")
    }
}
