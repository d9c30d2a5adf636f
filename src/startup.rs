use crate::{
    config::Config,
    data::{
        backup::BackupManager,
        store::{RoleStore, StoreConfig},
    },
    error::AppError,
};

/// Opens the document store described by the configuration.
///
/// Missing documents are created with defaults. A document that exists but cannot be parsed
/// or fails validation aborts startup, leaving the file untouched for an operator to repair
/// or restore from backup.
///
/// # Arguments
/// - `config` - Application configuration containing data and backup settings
///
/// # Returns
/// - `Ok(RoleStore)` - Store with every document loaded
/// - `Err(AppError::StoreErr)` - A document could not be read or trusted
pub fn open_store(config: &Config) -> Result<RoleStore, AppError> {
    let backups = BackupManager::new(
        &config.backup_dir,
        config.backup_keep_generations,
        config.display_offset,
    );

    let store = RoleStore::open(StoreConfig {
        data_dir: config.data_dir.clone(),
        managed_roles: config.managed_roles.clone(),
        default_retention_seconds: config.default_retention_seconds,
        backups,
    })?;

    tracing::info!(
        "Opened data store in {} (managed roles: {})",
        config.data_dir.display(),
        config.managed_roles.join(", ")
    );

    Ok(store)
}
