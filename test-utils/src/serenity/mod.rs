//! Test factories for creating Serenity API objects.
//!
//! This module provides factory functions for creating mock Serenity structs (Member, Role)
//! for testing purposes. These factories create valid Serenity objects by deserializing
//! JSON, simulating what Discord's API would return.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::{member::create_test_member, role::create_test_role};
//!
//! let role = create_test_role(1, 111111111, "Warning", 3);
//! let joined_at = Some("2024-01-01T00:00:00Z");
//! let member = create_test_member(1, 42, "alice", &[111111111], joined_at, false);
//! ```
//!
//! # Available Factories
//!
//! - `member::create_test_member` - Create Serenity Member objects
//! - `role::create_test_role` - Create Serenity Role objects

pub mod member;
pub mod role;

pub use member::create_test_member;
pub use role::create_test_role;
