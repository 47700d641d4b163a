//! Shared fixtures for the audit-log unit tests.

use serde_json::{json, Value};
use std::sync::Arc;

use auditcord_models::audit_log::{AuditLogAction, AuditLogEntryPayload};
use auditcord_models::auto_moderation::AutoModerationRule;
use auditcord_models::enums::TolerantEnum;
use auditcord_models::user::User;

use super::entry::{AuditLogContext, AuditLogEntry};
use crate::cache::{GlobalState, GuildSnapshot, GuildState};
use crate::config::AuditLogConfig;

/// Guild 1 owned by member 2, with channel 10, thread 11, roles 1 and 3,
/// stage instance 40, emoji 50, sticker 70, rule 60, and user 7 known only
/// from the payload.
pub(crate) fn fixture() -> Arc<AuditLogContext> {
    let snapshot: GuildSnapshot = serde_json::from_value(json!({
        "id": "1",
        "name": "Fixture Guild",
        "owner_id": "2",
        "channels": [
            { "id": "10", "type": 0, "name": "general" },
            { "id": "12", "type": 13, "name": "stage" }
        ],
        "threads": [{ "id": "11", "type": 11, "name": "help", "parent_id": "10" }],
        "roles": [
            { "id": "1", "name": "@everyone", "permissions": "104324673" },
            { "id": "3", "name": "mods", "color": 3447003, "permissions": "8" }
        ],
        "members": [{ "user": { "id": "2", "username": "owner" }, "nick": "boss", "roles": ["3"] }],
        "stage_instances": [{
            "id": "40", "guild_id": "1", "channel_id": "12",
            "topic": "town hall", "privacy_level": 2
        }]
    }))
    .unwrap();

    let global = GlobalState::new();
    global.insert_guild(snapshot.guild.clone());
    global.insert_emoji(
        serde_json::from_value(json!({ "id": "50", "guild_id": "1", "name": "wave" })).unwrap(),
    );
    global.insert_sticker(
        serde_json::from_value(json!({
            "id": "70", "guild_id": "1", "name": "party", "tags": "tada",
            "type": 2, "format_type": 1
        }))
        .unwrap(),
    );

    let users: Vec<User> = vec![serde_json::from_value(json!({ "id": "7", "username": "drifter" })).unwrap()];
    let rules: Vec<AutoModerationRule> = vec![serde_json::from_value(json!({
        "id": "60",
        "guild_id": "1",
        "name": "no spam",
        "creator_id": "2",
        "event_type": 1,
        "trigger_type": 3
    }))
    .unwrap()];

    Arc::new(
        AuditLogContext::new(
            Arc::new(GuildState::from_snapshot(snapshot)),
            Arc::new(global),
            AuditLogConfig::default(),
        )
        .with_users(users)
        .with_auto_moderation_rules(rules),
    )
}

pub(crate) fn fixture_entry(ctx: &Arc<AuditLogContext>, payload: Value) -> AuditLogEntry {
    let payload: AuditLogEntryPayload = serde_json::from_value(payload).unwrap();
    AuditLogEntry::from_payload(payload, Arc::clone(ctx)).unwrap()
}

/// An entry of `action` with id 100; `fields` are merged into the payload.
pub(crate) fn entry_with(
    ctx: &Arc<AuditLogContext>,
    action: AuditLogAction,
    fields: Value,
) -> AuditLogEntry {
    let mut payload = json!({ "id": "100", "action_type": action.value() });
    if let (Some(base), Value::Object(extra)) = (payload.as_object_mut(), fields) {
        base.extend(extra);
    }
    fixture_entry(ctx, payload)
}
