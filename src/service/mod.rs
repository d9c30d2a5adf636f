//! Service layer for business logic and orchestration.
//!
//! Services sit between the inbound surfaces (gateway events, schedulers, admin operations)
//! and the data and platform layers. Each service borrows the shared [`AppState`] and is
//! cheap to construct per call:
//!
//! - **Engine**: `reconcile`, `expiry` and `tenure` decide which roles to record, revoke
//!   and grant
//! - **Operations**: `grant`, `retention`, `history` and `admin` back the admin commands
//! - **Plumbing**: `audit` delivers audit records and `event` consumes the inbound queue
//!
//! [`AppState`]: crate::state::AppState

pub mod admin;
pub mod audit;
pub mod event;
pub mod expiry;
pub mod grant;
pub mod history;
pub mod reconcile;
pub mod retention;
pub mod tenure;

#[cfg(test)]
mod test;
