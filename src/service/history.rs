use crate::{
    error::AppError,
    model::history::{
        HistoryPage, IndexedEntry, RoleHistoryPage, ENTRIES_PER_PAGE, MAX_REASON_CHARS,
    },
    service::audit::AuditLog,
    state::AppState,
};

/// Read and annotate the grant history of managed roles.
pub struct HistoryService<'a> {
    state: &'a AppState,
}

impl<'a> HistoryService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Returns one page of a member's history.
    ///
    /// Each role contributes up to five entries per page, newest first, each carrying its
    /// insertion index. The page count is the largest count of any role, and `page` is
    /// clamped to the last page.
    ///
    /// # Arguments
    /// - `guild_id` - Guild of the member
    /// - `user_id` - Member whose history is shown
    /// - `page` - Zero-based page number
    ///
    /// # Returns
    /// - `HistoryPage` - Entries for the page; empty when the member has no history
    pub async fn page(&self, guild_id: u64, user_id: u64, page: usize) -> HistoryPage {
        let store = self.state.store.lock().await;

        let histories: Vec<(&String, Vec<IndexedEntry>)> = store
            .managed_roles()
            .iter()
            .map(|role_name| {
                let mut entries: Vec<IndexedEntry> = store
                    .role_history(guild_id, user_id, role_name)
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(index, entry)| IndexedEntry { index, entry })
                    .collect();
                entries.sort_by(|a, b| b.entry.timestamp.total_cmp(&a.entry.timestamp));
                (role_name, entries)
            })
            .filter(|(_, entries)| !entries.is_empty())
            .collect();

        let total_pages = histories
            .iter()
            .map(|(_, entries)| entries.len().div_ceil(ENTRIES_PER_PAGE))
            .max()
            .unwrap_or(1);
        let page = page.min(total_pages - 1);
        let start = page * ENTRIES_PER_PAGE;

        let roles = histories
            .into_iter()
            .map(|(role_name, entries)| RoleHistoryPage {
                role_name: role_name.clone(),
                total: entries.len(),
                entries: entries.into_iter().skip(start).take(ENTRIES_PER_PAGE).collect(),
            })
            .collect();

        HistoryPage {
            page,
            total_pages,
            roles,
        }
    }

    /// Replaces the reason of one history entry.
    ///
    /// # Arguments
    /// - `guild_id` - Guild of the member
    /// - `user_id` - Member whose history is edited
    /// - `role_name` - Managed role of the entry
    /// - `index` - Insertion index of the entry
    /// - `reason` - New reason, trimmed, at most 500 characters
    ///
    /// # Returns
    /// - `Ok(())` - Reason replaced; no other entry changed
    /// - `Err(AppError::BadRequest)` - Reason too long or role not managed
    /// - `Err(AppError::NotFound)` - No entry at that index
    pub async fn edit_reason(
        &self,
        guild_id: u64,
        user_id: u64,
        role_name: &str,
        index: usize,
        reason: &str,
    ) -> Result<(), AppError> {
        let reason = reason.trim();
        if reason.chars().count() > MAX_REASON_CHARS {
            return Err(AppError::BadRequest(format!(
                "Reason must be at most {} characters",
                MAX_REASON_CHARS
            )));
        }

        {
            let mut store = self.state.store.lock().await;
            if !store.is_managed(role_name) {
                return Err(AppError::BadRequest(format!("'{}' is not a managed role", role_name)));
            }

            store
                .edit_history_reason(guild_id, user_id, role_name, index, reason.to_string())
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "No {} history entry #{} for user {}",
                        role_name,
                        index + 1,
                        user_id
                    ))
                })?;
            store.save_all()?;
        }

        AuditLog::new(self.state)
            .info(
                guild_id,
                &format!(
                    "Reason of {} entry #{} for user {} updated",
                    role_name,
                    index + 1,
                    user_id
                ),
            )
            .await;

        Ok(())
    }
}
