//! Integration tests for rust-ddlparser
//!
//! This file serves as the entry point for all integration tests.

#[path = "common/mod.rs"]
mod common;

#[path = "integration/dialect_tests.rs"]
mod dialect_tests;

#[path = "integration/file_tests.rs"]
mod file_tests;
