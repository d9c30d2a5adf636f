//! Persistence layer for the JSON documents.
//!
//! The store keeps every document in memory and rewrites changed files wholesale, copying
//! the previous versions into the backup directory first. Documents are converted to domain
//! models at this boundary so the service layer never handles raw JSON.

pub mod backup;
pub mod document;
pub mod store;

#[cfg(test)]
mod test;
