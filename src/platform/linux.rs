//! Host system information.
//!
//! Reads hostname and kernel release from /proc and /etc on Linux, and
//! falls back to compile-time OS constants elsewhere.
//!
//! No function in this module will panic.

use crate::ZooError;
use std::fs;

/// Get the system hostname
pub fn get_hostname() -> Result<String, ZooError> {
    for source in ["/etc/hostname", "/proc/sys/kernel/hostname"] {
        if let Ok(hostname) = fs::read_to_string(source) {
            let hostname = hostname.trim().to_string();
            if !hostname.is_empty() {
                return Ok(hostname);
            }
        }
    }

    if let Ok(hostname) = std::env::var("HOSTNAME") {
        if !hostname.trim().is_empty() {
            return Ok(hostname.trim().to_string());
        }
    }

    Err(ZooError::Platform {
        context: "get_hostname".to_string(),
        message: "Could not read hostname from /etc/hostname or /proc".to_string(),
    })
}

/// Get kernel version from /proc/version
pub fn get_kernel_version() -> Result<String, ZooError> {
    let content = fs::read_to_string("/proc/version").map_err(|e| ZooError::Platform {
        context: "get_kernel_version".to_string(),
        message: e.to_string(),
    })?;
    parse_kernel_version(&content).ok_or_else(|| ZooError::Platform {
        context: "get_kernel_version".to_string(),
        message: "Could not parse kernel version".to_string(),
    })
}

/// Parse "Linux version X.Y.Z ..." -> "X.Y.Z"
fn parse_kernel_version(content: &str) -> Option<String> {
    let mut parts = content.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some("version"), Some(version)) => Some(version.to_string()),
        _ => None,
    }
}

/// Platform string for the environment table, e.g. `Linux-6.8.0-x86_64`
pub fn platform_description() -> String {
    let arch = std::env::consts::ARCH;
    match get_kernel_version() {
        Ok(kernel) => format!("Linux-{}-{}", kernel, arch),
        Err(_) => format!("{}-{}", std::env::consts::OS, arch),
    }
}
