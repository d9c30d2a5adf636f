use crate::state::AppState;

/// Discord's message length limit, in characters.
pub const MESSAGE_LIMIT: usize = 2000;

/// Severity of an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl AuditLevel {
    fn marker(self) -> &'static str {
        match self {
            Self::Info => "ℹ️",
            Self::Success => "✅",
            Self::Warning => "⚠️",
            Self::Error => "❌",
        }
    }
}

/// Per-guild audit trail.
///
/// Every record is mirrored into `tracing` and posted to the guild's audit channel, or to
/// its first text channel when none is configured. Delivery failures are logged and never
/// returned to the caller.
pub struct AuditLog<'a> {
    state: &'a AppState,
}

impl<'a> AuditLog<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Records an audit message for a guild.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the record belongs to
    /// - `level` - Severity, selecting the marker and the `tracing` level
    /// - `message` - Human-readable text
    pub async fn log(&self, guild_id: u64, level: AuditLevel, message: &str) {
        match level {
            AuditLevel::Info | AuditLevel::Success => {
                tracing::info!("[guild {}] {}", guild_id, message)
            }
            AuditLevel::Warning => tracing::warn!("[guild {}] {}", guild_id, message),
            AuditLevel::Error => tracing::error!("[guild {}] {}", guild_id, message),
        }

        let channel_id = self.state.store.lock().await.log_channel(guild_id);
        let content = truncate(&format!("{} {}", level.marker(), message), MESSAGE_LIMIT);

        if let Err(e) = self
            .state
            .platform
            .send_audit(guild_id, channel_id, &content)
            .await
        {
            tracing::error!("Failed to deliver audit message to guild {}: {}", guild_id, e);
        }
    }

    pub async fn info(&self, guild_id: u64, message: &str) {
        self.log(guild_id, AuditLevel::Info, message).await
    }

    pub async fn success(&self, guild_id: u64, message: &str) {
        self.log(guild_id, AuditLevel::Success, message).await
    }

    pub async fn warning(&self, guild_id: u64, message: &str) {
        self.log(guild_id, AuditLevel::Warning, message).await
    }
}

/// Cuts `text` to at most `limit` characters.
fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
