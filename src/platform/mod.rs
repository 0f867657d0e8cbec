//! Platform abstraction layer.
//!
//! Provides consistent interfaces for:
//! - Git LFS placeholder fetch and restore
//! - CI provenance from the environment
//! - Host and operating system information

pub mod ci;
pub mod lfs;
pub mod linux;
