use super::*;
use crate::{model::history::MAX_REASON_CHARS, service::history::HistoryService};

/// Seven `Warning` entries at t=1..7 and two `Caution` entries.
fn seeded_history() -> TestBuilder {
    let warnings: Vec<_> = (1..=7)
        .map(|t| {
            let timestamp = f64::from(t);
            json!({ "timestamp": timestamp, "reason": format!("warning {}", t) })
        })
        .collect();

    TestBuilder::new().with_document(
        fixture::ROLE_HISTORY_FILE,
        json!({
            GUILD_ID.to_string(): {
                USER_ID.to_string(): {
                    "Warning": warnings,
                    "Caution": [
                        { "timestamp": 20.0, "reason": "first" },
                        { "timestamp": 10.0, "reason": "second" }
                    ]
                }
            }
        }),
    )
}

fn indices(page: &crate::model::history::HistoryPage, role_name: &str) -> Vec<usize> {
    page.roles
        .iter()
        .find(|role| role.role_name == role_name)
        .map(|role| role.entries.iter().map(|entry| entry.index).collect())
        .unwrap_or_default()
}

/// Tests paging through a member's history.
///
/// Verifies newest first ordering by timestamp, stable insertion indices, five entries per
/// role per page, and clamping of pages past the end.
///
/// Expected: two pages
#[tokio::test]
async fn pages_newest_first() {
    let (_test, _platform, state) = setup(seeded_history(), guild(vec![]));
    let history = HistoryService::new(&state);

    let first = history.page(GUILD_ID, USER_ID, 0).await;
    assert_eq!(first.total_pages, 2);
    assert_eq!(indices(&first, "Warning"), vec![6, 5, 4, 3, 2]);
    assert_eq!(indices(&first, "Caution"), vec![0, 1]);

    let second = history.page(GUILD_ID, USER_ID, 1).await;
    assert_eq!(indices(&second, "Warning"), vec![1, 0]);
    assert!(indices(&second, "Caution").is_empty());
    assert_eq!(second.roles.iter().map(|role| role.total).sum::<usize>(), 9);

    let clamped = history.page(GUILD_ID, USER_ID, 9).await;
    assert_eq!(clamped.page, 1);
}

/// Tests the history of a member without entries.
///
/// Expected: empty single page
#[tokio::test]
async fn empty_history_has_one_page() {
    let (_test, _platform, state) = setup(TestBuilder::new(), guild(vec![]));

    let page = HistoryService::new(&state).page(GUILD_ID, USER_ID, 3).await;

    assert!(page.is_empty());
    assert_eq!((page.page, page.total_pages), (0, 1));
}

/// Tests editing one entry's reason.
///
/// Expected: Ok with only that entry changed, on disk too
#[tokio::test]
async fn edits_only_the_indexed_reason() -> Result<(), AppError> {
    let (test, _platform, state) = setup(seeded_history(), guild(vec![]));

    HistoryService::new(&state)
        .edit_reason(GUILD_ID, USER_ID, "Caution", 1, "  appeal accepted  ")
        .await?;

    assert_eq!(
        state.store.lock().await.role_history(GUILD_ID, USER_ID, "Caution"),
        &[
            HistoryEntry::new(20.0, "first"),
            HistoryEntry::new(10.0, "appeal accepted"),
        ]
    );
    let on_disk = test.read_document(fixture::ROLE_HISTORY_FILE).unwrap();
    let user = &on_disk[GUILD_ID.to_string()][USER_ID.to_string()];
    assert_eq!(user["Caution"][1]["reason"], json!("appeal accepted"));
    assert_eq!(user["Warning"][0]["reason"], json!("warning 1"));

    Ok(())
}

/// Tests the reason length limit.
///
/// Expected: Ok at the limit, Err(BadRequest) one character over
#[tokio::test]
async fn enforces_reason_length() -> Result<(), AppError> {
    let (_test, _platform, state) = setup(seeded_history(), guild(vec![]));
    let history = HistoryService::new(&state);

    history
        .edit_reason(GUILD_ID, USER_ID, "Warning", 0, &"a".repeat(MAX_REASON_CHARS))
        .await?;
    let result = history
        .edit_reason(GUILD_ID, USER_ID, "Warning", 0, &"a".repeat(MAX_REASON_CHARS + 1))
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests editing entries that cannot be edited.
///
/// Expected: Err(NotFound) out of range, Err(BadRequest) for unmanaged roles
#[tokio::test]
async fn rejects_unknown_entries() {
    let (_test, _platform, state) = setup(seeded_history(), guild(vec![]));
    let history = HistoryService::new(&state);

    let out_of_range = history.edit_reason(GUILD_ID, USER_ID, "Caution", 2, "late").await;
    let unmanaged = history.edit_reason(GUILD_ID, USER_ID, "member", 0, "late").await;

    assert!(matches!(out_of_range, Err(AppError::NotFound(_))));
    assert!(matches!(unmanaged, Err(AppError::BadRequest(_))));
}
