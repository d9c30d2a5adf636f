use super::*;
use crate::{
    model::{event::RoleEvent, guild::MemberSnapshot},
    service::event::{enqueue, handle_event, EventWorker},
};

/// Member who joined `days` days before the real current time.
///
/// Event handling reads the clock, so join times are relative to it.
fn joined_days_ago(user_id: u64, role_ids: &[u64], days: i64) -> MemberSnapshot {
    MemberSnapshot {
        joined_at: Some(Utc::now() - Duration::days(days)),
        ..member(user_id, role_ids, 0)
    }
}

/// Tests a guild becoming available.
///
/// Expected: Ok with a startup audit record and live managed roles tracked
#[tokio::test]
async fn guild_available_runs_startup_sync() -> Result<(), AppError> {
    let (_test, platform, state) =
        setup(TestBuilder::new(), guild(vec![member(USER_ID, &[WARNING_ROLE_ID], 200)]));

    handle_event(&state, RoleEvent::GuildAvailable { guild_id: GUILD_ID }).await?;

    let audits = platform.audits();
    assert!(audits[0].contains("Bot started"));
    assert!(audits.iter().any(|audit| audit.contains("startup sync")));
    assert!(state.store.lock().await.assigned_at(GUILD_ID, USER_ID, "Warning").is_some());

    Ok(())
}

/// Tests a member gaining a managed role and a trigger role at once.
///
/// Expected: Ok with the managed role tracked and the tenure promotion applied
#[tokio::test]
async fn member_roles_added_registers_and_promotes() -> Result<(), AppError> {
    let builder = TestBuilder::new().with_document(
        fixture::TENURE_RULES_FILE,
        fixture::tenure_rule(GUILD_ID, "check", "member", 90),
    );
    let veteran = joined_days_ago(USER_ID, &[WARNING_ROLE_ID, CHECK_ROLE_ID], 100);
    let (_test, platform, state) = setup(builder, guild(vec![veteran.clone()]));

    handle_event(
        &state,
        RoleEvent::MemberRolesAdded {
            guild_id: GUILD_ID,
            member: veteran,
            added_role_ids: vec![WARNING_ROLE_ID, CHECK_ROLE_ID],
        },
    )
    .await?;

    assert!(state.store.lock().await.assigned_at(GUILD_ID, USER_ID, "Warning").is_some());
    let held = platform.member_roles(GUILD_ID, USER_ID);
    assert!(held.contains(&MEMBER_ROLE_ID));
    assert!(!held.contains(&CHECK_ROLE_ID));

    Ok(())
}

/// Tests role changes of a bot account.
///
/// Expected: Ok with nothing tracked and no platform calls
#[tokio::test]
async fn bot_members_are_ignored() -> Result<(), AppError> {
    let (_test, platform, state) = setup(TestBuilder::new(), guild(vec![]));
    let mut bot = joined_days_ago(4242, &[WARNING_ROLE_ID], 100);
    bot.is_bot = true;

    handle_event(
        &state,
        RoleEvent::MemberRolesAdded {
            guild_id: GUILD_ID,
            member: bot,
            added_role_ids: vec![WARNING_ROLE_ID],
        },
    )
    .await?;

    assert_eq!(state.store.lock().await.tracked_user_count(GUILD_ID), 0);
    assert!(platform.calls().is_empty());

    Ok(())
}

/// Tests the worker draining the queue until the sender is dropped.
///
/// Expected: the queued event is handled and the worker stops
#[tokio::test]
async fn worker_drains_queue() {
    let target = joined_days_ago(USER_ID, &[CAUTION_ROLE_ID], 10);
    let (_test, _platform, state) = setup(TestBuilder::new(), guild(vec![target.clone()]));
    let (worker, sender) = EventWorker::new(state.clone());

    sender
        .send(RoleEvent::MemberRolesAdded {
            guild_id: GUILD_ID,
            member: target,
            added_role_ids: vec![CAUTION_ROLE_ID],
        })
        .unwrap();
    drop(sender);
    worker.run().await;

    assert!(state.store.lock().await.assigned_at(GUILD_ID, USER_ID, "Caution").is_some());
}

/// Tests queueing an event after the worker has gone away.
///
/// Expected: Err(InternalError) instead of a silent drop
#[tokio::test]
async fn enqueue_fails_without_worker() {
    let (_test, _platform, state) = setup(TestBuilder::new(), guild(vec![]));
    let (worker, sender) = EventWorker::new(state);
    drop(worker);

    let result = enqueue(&sender, RoleEvent::GuildAvailable { guild_id: GUILD_ID });

    assert!(matches!(result, Err(AppError::InternalError(_))));
}
