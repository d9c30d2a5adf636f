use chrono::{Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use test_utils::{builder::TestBuilder, context::TestContext, fixture};

use crate::{
    error::{store::StoreError, AppError},
    model::{guild::GuildSnapshot, history::HistoryEntry},
    platform::mock::{MockPlatform, PlatformCall},
    state::AppState,
    testing::{
        ago, guild, member, now, role, roles, test_state, ADMIN_ROLE_ID, BOT_ROLE_ID,
        CAUTION_ROLE_ID, CHECK_ROLE_ID, DAY, GUILD_ID, MEMBER_ROLE_ID, NINETY_DAYS, USER_ID,
        WARNING_ROLE_ID,
    },
    util::time::to_unix,
};

mod event;
mod history;

/// Builds the test directory, a mock platform serving `snapshot`, and state over both.
fn setup(
    builder: TestBuilder,
    snapshot: GuildSnapshot,
) -> (TestContext, Arc<MockPlatform>, AppState) {
    let test = builder.build().unwrap();
    let platform = Arc::new(MockPlatform::new().with_guild(snapshot));
    let state = test_state(&test, platform.clone());
    (test, platform, state)
}

/// Builder seeded with one `Warning` assignment of [`USER_ID`] made `seconds_ago`.
fn warning_assigned(seconds_ago: i64) -> TestBuilder {
    TestBuilder::new().with_document(
        fixture::ROLES_DATA_FILE,
        fixture::assignments(GUILD_ID, USER_ID, "Warning", to_unix(ago(seconds_ago))),
    )
}
