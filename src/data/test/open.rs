use super::*;

/// Tests opening a store in an empty data directory.
///
/// Verifies that every missing document is created on disk and that settings carry a
/// default retention for each managed role.
///
/// Expected: Ok with five files created
#[test]
fn creates_missing_documents_with_defaults() -> Result<(), StoreError> {
    let test = TestBuilder::new().build().unwrap();

    let store = open_store(&test)?;

    for kind in DocumentKind::ALL {
        assert!(test.data_dir().join(kind.file_name()).exists(), "{} missing", kind);
    }
    let settings = test.read_document(fixture::SETTINGS_FILE).unwrap();
    assert_eq!(settings["remove_seconds"]["Warning"], json!(90 * 86_400));
    assert_eq!(settings["remove_seconds"]["Caution"], json!(90 * 86_400));
    assert_eq!(store.default_retention("Warning"), 90 * 86_400);

    Ok(())
}

/// Tests opening a store over existing documents.
///
/// Verifies that assignments, overrides, log channels and tenure rules are read back.
///
/// Expected: Ok with all seeded values visible
#[test]
fn loads_existing_documents() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_document(
            fixture::ROLES_DATA_FILE,
            fixture::assignments(GUILD_ID, USER_ID, "Warning", 1_700_000_000.0),
        )
        .with_document(
            fixture::SETTINGS_FILE,
            fixture::settings("Warning", 3600, Some((GUILD_ID, USER_ID, 60))),
        )
        .with_document(fixture::LOG_CHANNEL_FILE, fixture::log_channel(GUILD_ID, 555))
        .with_document(
            fixture::TENURE_RULES_FILE,
            fixture::tenure_rule(GUILD_ID, "check", "member", 30),
        )
        .build()
        .unwrap();

    let store = open_store(&test)?;

    assert_eq!(
        store.assigned_at(GUILD_ID, USER_ID, "Warning"),
        DateTime::from_timestamp(1_700_000_000, 0)
    );
    assert_eq!(store.default_retention("Warning"), 3600);
    assert_eq!(store.retention(GUILD_ID, USER_ID, "Warning"), 60);
    assert_eq!(store.retention(GUILD_ID, USER_ID + 1, "Warning"), 3600);
    assert_eq!(store.log_channel(GUILD_ID), Some(555));
    assert_eq!(
        store.tenure_rule(GUILD_ID, "check"),
        Some(&TenureRule {
            target_role: "member".to_string(),
            tenure_days: 30,
        })
    );

    Ok(())
}

/// Tests that settings missing a managed role are completed on load.
///
/// Expected: Ok with the missing role at the configured default
#[test]
fn fills_missing_retention_defaults() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_document(fixture::SETTINGS_FILE, fixture::settings("Warning", 3600, None))
        .build()
        .unwrap();

    let store = open_store(&test)?;

    assert_eq!(store.default_retention("Warning"), 3600);
    assert_eq!(store.default_retention("Caution"), 90 * 86_400);

    Ok(())
}

/// Tests opening a store over a document that is not valid JSON.
///
/// Verifies that startup fails and the corrupt file is left untouched.
///
/// Expected: Err(StoreError::Json)
#[test]
fn fails_on_malformed_document() {
    let test = TestBuilder::new()
        .with_raw_file(fixture::ROLES_DATA_FILE, "{ not json")
        .build()
        .unwrap();

    let result = open_store(&test);

    assert!(matches!(result, Err(StoreError::Json { .. })));
    let content = std::fs::read_to_string(test.data_dir().join(fixture::ROLES_DATA_FILE)).unwrap();
    assert_eq!(content, "{ not json");
}

/// Tests opening a store over a document that parses but fails validation.
///
/// Expected: Err(StoreError::Invalid)
#[test]
fn fails_on_invalid_tenure_rule() {
    let test = TestBuilder::new()
        .with_document(
            fixture::TENURE_RULES_FILE,
            fixture::tenure_rule(GUILD_ID, "check", "member", 0),
        )
        .build()
        .unwrap();

    let result = open_store(&test);

    assert!(matches!(result, Err(StoreError::Invalid { document: "tenure_rules", .. })));
}

/// Tests that a negative assignment timestamp is rejected.
///
/// Expected: Err(StoreError::Invalid)
#[test]
fn fails_on_negative_timestamp() {
    let test = TestBuilder::new()
        .with_document(
            fixture::ROLES_DATA_FILE,
            fixture::assignments(GUILD_ID, USER_ID, "Warning", -5.0),
        )
        .build()
        .unwrap();

    assert!(matches!(open_store(&test), Err(StoreError::Invalid { .. })));
}

/// Tests that an assignment timestamp beyond the representable date range is rejected.
///
/// Expected: Err(StoreError::Invalid)
#[test]
fn fails_on_out_of_range_timestamp() {
    let test = TestBuilder::new()
        .with_document(
            fixture::ROLES_DATA_FILE,
            fixture::assignments(GUILD_ID, USER_ID, "Warning", 1e18),
        )
        .build()
        .unwrap();

    assert!(matches!(open_store(&test), Err(StoreError::Invalid { .. })));
}

/// Tests reloading assignments after the file was replaced with garbage.
///
/// Verifies that the reload fails and in-memory state is kept.
///
/// Expected: Err with the previous assignment still visible
#[test]
fn reload_keeps_memory_on_corrupt_file() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_document(
            fixture::ROLES_DATA_FILE,
            fixture::assignments(GUILD_ID, USER_ID, "Warning", 1_700_000_000.0),
        )
        .build()
        .unwrap();
    let mut store = open_store(&test)?;

    std::fs::write(test.data_dir().join(fixture::ROLES_DATA_FILE), "[1, 2").unwrap();

    assert!(store.reload_assignments().is_err());
    assert!(store.assigned_at(GUILD_ID, USER_ID, "Warning").is_some());

    Ok(())
}
