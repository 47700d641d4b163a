use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use auditcord_core::{
    AuditLogConfig, AuditLogContext, AuditLogEntry, GlobalState, GuildSnapshot, GuildState,
};
use auditcord_models::audit_log::AuditLogPayload;
use auditcord_models::emoji::Emoji;
use auditcord_models::guild::Guild;
use auditcord_models::sticker::GuildSticker;
use auditcord_models::user::User;

/// Everything needed to decode one audit-log page offline.
#[derive(Debug, Deserialize)]
pub struct Snapshot {
    pub guild: GuildSnapshot,
    /// Other guilds the client knows about, for `guild_id` changes.
    #[serde(default)]
    pub guilds: Vec<Guild>,
    #[serde(default)]
    pub emojis: Vec<Emoji>,
    #[serde(default)]
    pub stickers: Vec<GuildSticker>,
    #[serde(default)]
    pub users: Vec<User>,
    pub audit_log: AuditLogPayload,
}

impl Snapshot {
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("malformed snapshot {}", path.display()))
    }

    /// Decode every entry, skipping the ones whose options do not decode.
    pub fn decode(self, config: AuditLogConfig) -> Vec<AuditLogEntry> {
        let global = GlobalState::new();
        global.insert_guild(self.guild.guild.clone());
        for guild in self.guilds {
            global.insert_guild(guild);
        }
        for emoji in self.emojis {
            global.insert_emoji(emoji);
        }
        for sticker in self.stickers {
            global.insert_sticker(sticker);
        }
        for user in self.users {
            global.insert_user(user);
        }

        let (ctx, entries) = AuditLogContext::for_page(
            self.audit_log,
            Arc::new(GuildState::from_snapshot(self.guild)),
            Arc::new(global),
            config,
        );

        entries
            .into_iter()
            .filter_map(|payload| {
                let id = payload.id;
                match AuditLogEntry::from_payload(payload, Arc::clone(&ctx)) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!(entry_id = id, "skipping audit log entry: {e}");
                        None
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> Snapshot {
        serde_json::from_value(json!({
            "guild": { "id": "1", "name": "Den", "owner_id": "2" },
            "users": [{ "id": "2", "username": "keeper" }],
            "audit_log": {
                "audit_log_entries": [
                    { "id": "10", "action_type": 22, "user_id": "2", "target_id": "3" },
                    { "id": "11", "action_type": 27, "options": { "count": "lots" } },
                    { "id": "12", "action_type": 27, "options": { "count": "4" } }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn undecodable_entries_are_skipped() {
        let entries = snapshot().decode(AuditLogConfig::default());
        let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![10, 12]);
        assert_eq!(entries[1].extra.count(), Some(4));
    }

    #[test]
    fn global_users_back_up_the_actor() {
        let entries = snapshot().decode(AuditLogConfig::default());
        assert_eq!(
            entries[0].user.as_ref().map(|u| u.user().username.as_str()),
            Some("keeper")
        );
    }

    #[test]
    fn read_reports_the_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("snapshot.json");
        std::fs::write(&path, "{ not json").expect("write snapshot");
        let err = Snapshot::read(&path).unwrap_err();
        assert!(err.to_string().contains("snapshot.json"));
    }
}
