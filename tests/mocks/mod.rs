//! Mock collaborators for running reports without Python or Git LFS.
//!
//! - `MockBackend` answers inspect/check/convert per file name and counts calls
//! - `MockStore` simulates placeholder fetch and restore on the real files
//! - `ZooTree` builds model trees inside a temp dir

pub mod backend;
pub mod tree;

pub use backend::*;
pub use store::*;
pub use tree::*;
