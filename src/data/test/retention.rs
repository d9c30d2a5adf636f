use super::*;

/// Tests that an override takes precedence over the role default.
///
/// Expected: Ok with the override while set and the default after clearing
#[test]
fn override_falls_back_to_default() -> Result<(), StoreError> {
    let test = TestBuilder::new().build().unwrap();
    let mut store = open_store(&test)?;

    store.set_retention_override(GUILD_ID, USER_ID, "Warning", 120);
    assert_eq!(store.retention(GUILD_ID, USER_ID, "Warning"), 120);

    assert!(store.clear_retention_override(GUILD_ID, USER_ID, "Warning"));
    assert_eq!(store.retention(GUILD_ID, USER_ID, "Warning"), 90 * 86_400);
    assert!(!store.clear_retention_override(GUILD_ID, USER_ID, "Warning"));

    Ok(())
}

/// Tests that setting an override to zero deletes it.
///
/// Verifies the settings document no longer carries any override map.
///
/// Expected: Ok with no `user_remove_seconds` on disk
#[test]
fn zero_override_deletes_it() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_document(
            fixture::SETTINGS_FILE,
            fixture::settings("Warning", 3600, Some((GUILD_ID, USER_ID, 60))),
        )
        .build()
        .unwrap();
    let mut store = open_store(&test)?;

    store.set_retention_override(GUILD_ID, USER_ID, "Warning", 0);
    store.save_all()?;

    assert_eq!(store.retention_override(GUILD_ID, USER_ID, "Warning"), None);
    let saved = test.read_document(fixture::SETTINGS_FILE).unwrap();
    assert!(saved.get("user_remove_seconds").is_none());

    Ok(())
}
