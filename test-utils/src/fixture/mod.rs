//! Test fixtures providing JSON documents in their on-disk shape.
//!
//! This module contains fixture functions that build `serde_json::Value` documents matching
//! the files the bot persists. Fixtures do NOT touch the filesystem; pass them to
//! `TestBuilder::with_document` to seed a data directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use test_utils::fixture;
//!
//! let doc = fixture::assignments(1, 2, "Warning", 1_700_000_000.0);
//! let rules = fixture::tenure_rule(1, "check", "member", 90);
//! ```

pub mod documents;

pub use documents::*;
