use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use test_utils::{builder::TestBuilder, fixture};

use crate::{
    error::store::StoreError,
    model::{backup::DocumentKind, history::HistoryEntry, tenure::TenureRule},
    testing::{open_store, GUILD_ID, USER_ID},
};

mod open;
mod retention;
