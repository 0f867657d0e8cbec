//! Integration tests for zoo-status.
//!
//! These tests run full reports over temporary model trees with mock
//! collaborators.

pub mod cli_tests;
pub mod output_tests;
