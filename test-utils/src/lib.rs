//! Rolekeeper Test Utils
//!
//! Provides shared testing utilities for building unit tests for the rolekeeper bot. This
//! crate offers a builder pattern for creating test contexts backed by a temporary data
//! directory that can be seeded with JSON documents before the store under test opens it.
//!
//! # Overview
//!
//! The test utilities consist of four main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment owning the temporary data and backup directories
//! - **fixture**: JSON document fixtures in the exact on-disk shape
//! - **serenity**: Factories for Serenity models deserialized from JSON
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, fixture};
//!
//! #[tokio::test]
//! async fn test_store_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_document(fixture::ROLES_DATA_FILE, fixture::assignments(1, 2, "Warning", 0.0))
//!         .build()?;
//!
//!     let data_dir = test.data_dir();
//!     // Open the store against data_dir...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod fixture;
pub mod serenity;
