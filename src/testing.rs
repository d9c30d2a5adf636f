//! Shared setup for unit tests: configuration, store and state over a temporary directory.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use std::{sync::Arc, time::Duration as StdDuration};
use test_utils::context::TestContext;

use crate::{
    config::Config,
    data::store::RoleStore,
    error::store::StoreError,
    model::guild::{GuildRole, GuildSnapshot, MemberSnapshot},
    platform::mock::MockPlatform,
    startup,
    state::AppState,
};

pub const GUILD_ID: u64 = 1000;
pub const USER_ID: u64 = 2000;
pub const BOT_USER_ID: u64 = 9000;

pub const BOT_ROLE_ID: u64 = 10;
pub const WARNING_ROLE_ID: u64 = 11;
pub const CAUTION_ROLE_ID: u64 = 12;
pub const CHECK_ROLE_ID: u64 = 13;
pub const MEMBER_ROLE_ID: u64 = 14;
pub const ADMIN_ROLE_ID: u64 = 15;

pub const DAY: i64 = 86_400;
pub const NINETY_DAYS: i64 = 90 * DAY;

/// Configuration pointing at the test directories, with no delays.
pub fn test_config(test: &TestContext) -> Config {
    Config {
        discord_bot_token: "test-token".to_string(),
        data_dir: test.data_dir(),
        backup_dir: test.backup_dir(),
        backup_keep_generations: 3,
        managed_roles: vec!["Caution".to_string(), "Warning".to_string()],
        default_retention_seconds: NINETY_DAYS,
        check_interval: StdDuration::from_secs(600),
        sync_interval: StdDuration::from_secs(3600),
        batch_size: 2,
        api_delay: StdDuration::ZERO,
        member_delay: StdDuration::ZERO,
        display_offset: FixedOffset::east_opt(9 * 3600).unwrap(),
        debug: false,
    }
}

pub fn open_store(test: &TestContext) -> Result<RoleStore, StoreError> {
    match startup::open_store(&test_config(test)) {
        Ok(store) => Ok(store),
        Err(crate::error::AppError::StoreErr(e)) => Err(e),
        Err(e) => panic!("unexpected error opening store: {}", e),
    }
}

/// State over a freshly opened store and the given mock platform.
pub fn test_state(test: &TestContext, platform: Arc<MockPlatform>) -> AppState {
    let store = open_store(test).unwrap();
    AppState::new(store, platform, test_config(test))
}

/// Fixed reference time used by service tests.
pub fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_800_000_000, 0).unwrap()
}

/// Time `seconds` before [`now`].
pub fn ago(seconds: i64) -> DateTime<Utc> {
    now() - Duration::seconds(seconds)
}

pub fn role(id: u64, name: &str, position: u16) -> GuildRole {
    GuildRole {
        id,
        name: name.to_string(),
        position,
    }
}

/// Standard role set; the bot's role sits below `Admin` and above everything else.
pub fn roles() -> Vec<GuildRole> {
    vec![
        role(BOT_ROLE_ID, "rolekeeper", 10),
        role(WARNING_ROLE_ID, "Warning", 3),
        role(CAUTION_ROLE_ID, "Caution", 2),
        role(CHECK_ROLE_ID, "check", 4),
        role(MEMBER_ROLE_ID, "member", 5),
        role(ADMIN_ROLE_ID, "Admin", 20),
    ]
}

/// Human member who joined `joined_days_ago` days before [`now`].
pub fn member(user_id: u64, role_ids: &[u64], joined_days_ago: i64) -> MemberSnapshot {
    MemberSnapshot {
        user_id,
        display_name: format!("user{}", user_id),
        is_bot: false,
        role_ids: role_ids.to_vec(),
        joined_at: Some(now() - Duration::days(joined_days_ago)),
    }
}

/// The bot's own member entry.
pub fn bot_member() -> MemberSnapshot {
    MemberSnapshot {
        user_id: BOT_USER_ID,
        display_name: "rolekeeper".to_string(),
        is_bot: true,
        role_ids: vec![BOT_ROLE_ID],
        joined_at: None,
    }
}

/// Complete guild snapshot with the standard roles, the bot and `members`.
pub fn guild(members: Vec<MemberSnapshot>) -> GuildSnapshot {
    let mut all = vec![bot_member()];
    all.extend(members);

    GuildSnapshot {
        guild_id: GUILD_ID,
        name: "test guild".to_string(),
        complete: true,
        roles: roles(),
        members: all,
        bot_user_id: Some(BOT_USER_ID),
    }
}
