//! Background jobs driven by `tokio-cron-scheduler`.
//!
//! Two repeated jobs run for the lifetime of the process: a short-interval expiry sweep
//! over every guild, and a longer-interval reconciliation that rebuilds stored assignments
//! from live rosters. Each job logs its own failures and never stops the scheduler.

pub mod reconciliation;
pub mod role_expiry;
