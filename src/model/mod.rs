//! Domain models and parameter types.
//!
//! This module contains the domain models used throughout the service layer. Store
//! documents are converted to these types at the data boundary and Serenity models are
//! converted at the platform boundary, so services never depend on either JSON shapes or
//! gateway payloads.

pub mod assignment;
pub mod backup;
pub mod event;
pub mod grant;
pub mod guild;
pub mod history;
pub mod status;
pub mod sync;
pub mod tenure;
