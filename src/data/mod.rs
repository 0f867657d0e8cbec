//! Data module for zoo-status
//!
//! Contains the known-limitation marker table.

pub mod markers;
