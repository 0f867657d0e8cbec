//! Report engine.
//!
//! Provides the directory walk, run orchestration and result aggregation.

pub mod orchestrator;
pub mod result;
pub mod walker;
