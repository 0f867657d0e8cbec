//! Git LFS access.
//!
//! Model files are stored as LFS pointers and fetched one at a time, then
//! turned back into pointers so a full run never holds more than one large
//! object on disk.
//!
//! # Graceful Degradation
//!
//! - `git lfs` missing: `ensure_available` returns `ExtensionMissing`
//! - Fetch failure: returned to the caller, which reports the file skipped
//! - File not tracked by LFS: `restore_placeholder` is a no-op

use crate::ZooError;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Access to the large-file storage extension
pub trait LargeFileStore {
    /// Verify the extension is installed
    fn ensure_available(&self) -> Result<(), ZooError>;

    /// Download the content of one placeholder file
    fn fetch(&self, file: &Path) -> Result<(), ZooError>;

    /// Put the placeholder back and drop the cached content
    fn restore_placeholder(&self, file: &Path) -> Result<(), ZooError>;
}

/// Parsed LFS pointer file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LfsPointer {
    /// sha256 object id (hex)
    pub oid: String,
    pub size: u64,
}

impl LfsPointer {
    /// Parse pointer text; None when the content is not a pointer
    pub fn parse(content: &str) -> Option<Self> {
        let mut lines = content.lines();
        if !lines.next()?.starts_with("version https://git-lfs") {
            return None;
        }

        let mut oid = None;
        let mut size = None;
        for line in lines {
            if let Some(value) = line.strip_prefix("oid sha256:") {
                oid = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("size ") {
                size = value.trim().parse().ok();
            }
        }

        let oid = oid.filter(|o| o.len() > 4 && o.chars().all(|c| c.is_ascii_hexdigit()))?;
        Some(LfsPointer { oid, size: size? })
    }

    /// Location of the object inside `<git-dir>/lfs/objects`
    pub fn object_path(&self, git_dir: &Path) -> PathBuf {
        git_dir
            .join("lfs")
            .join("objects")
            .join(&self.oid[0..2])
            .join(&self.oid[2..4])
            .join(&self.oid)
    }
}

/// `git lfs` invoked from the models directory
#[derive(Debug)]
pub struct GitLfs {
    work_dir: PathBuf,
    toplevel: OnceCell<PathBuf>,
}

impl GitLfs {
    pub fn new(work_dir: PathBuf) -> Self {
        GitLfs {
            work_dir,
            toplevel: OnceCell::new(),
        }
    }

    fn git(&self, args: &[&str]) -> Result<Output, ZooError> {
        let command = format!("git {}", args.join(" "));
        debug!(%command, "running");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|e| ZooError::Command {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if output.status.success() {
            Ok(output)
        } else {
            Err(ZooError::Command {
                command,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    fn git_stdout(&self, args: &[&str]) -> Result<String, ZooError> {
        let output = self.git(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Repository root containing the models directory
    fn toplevel(&self) -> Result<&Path, ZooError> {
        if let Some(path) = self.toplevel.get() {
            return Ok(path);
        }
        let raw = self.git_stdout(&["rev-parse", "--show-toplevel"])?;
        let path = PathBuf::from(raw)
            .canonicalize()
            .map_err(|e| ZooError::io("resolving repository root", e))?;
        Ok(self.toplevel.get_or_init(|| path))
    }

    /// Git directory shared by all worktrees (holds the LFS object store)
    fn common_dir(&self) -> Result<PathBuf, ZooError> {
        let raw = PathBuf::from(self.git_stdout(&["rev-parse", "--git-common-dir"])?);
        Ok(if raw.is_absolute() {
            raw
        } else {
            self.work_dir.join(raw)
        })
    }

    /// Path of `file` relative to the repository root, `/`-separated
    fn repo_relative(&self, file: &Path) -> Result<String, ZooError> {
        let toplevel = self.toplevel()?;
        let absolute = file
            .canonicalize()
            .map_err(|e| ZooError::io(format!("resolving {}", file.display()), e))?;
        let relative = absolute
            .strip_prefix(toplevel)
            .map_err(|_| ZooError::Platform {
                context: "repo_relative".to_string(),
                message: format!("{} is outside {}", file.display(), toplevel.display()),
            })?;
        Ok(crate::display_path(relative))
    }
}

impl LargeFileStore for GitLfs {
    fn ensure_available(&self) -> Result<(), ZooError> {
        match self.git(&["lfs", "version"]) {
            Ok(output) => {
                debug!(
                    version = %String::from_utf8_lossy(&output.stdout).trim(),
                    "git lfs available"
                );
                Ok(())
            }
            Err(e) => Err(ZooError::ExtensionMissing {
                extension: "git-lfs".to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn fetch(&self, file: &Path) -> Result<(), ZooError> {
        let relative = self.repo_relative(file)?;
        let toplevel = self.toplevel()?.to_path_buf();
        let include = format!("--include={}", relative);
        let output = Command::new("git")
            .args(["lfs", "pull", include.as_str(), "--exclude="])
            .current_dir(&toplevel)
            .output()
            .map_err(|e| ZooError::Command {
                command: "git lfs pull".to_string(),
                message: e.to_string(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ZooError::Command {
                command: format!("git lfs pull {}", include),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    fn restore_placeholder(&self, file: &Path) -> Result<(), ZooError> {
        let relative = self.repo_relative(file)?;
        let revision = format!("HEAD:{}", relative);
        let blob = self.git(&["show", revision.as_str()])?.stdout;

        let Some(pointer) = LfsPointer::parse(&String::from_utf8_lossy(&blob)) else {
            debug!(file = %relative, "not an LFS pointer, nothing to restore");
            return Ok(());
        };

        std::fs::write(file, &blob)
            .map_err(|e| ZooError::io(format!("restoring {}", relative), e))?;

        let object = pointer.object_path(&self.common_dir()?);
        match std::fs::remove_file(&object) {
            Ok(()) => debug!(object = %object.display(), "purged cached object"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ZooError::io(format!("purging {}", object.display()), e)),
        }
        Ok(())
    }
}
