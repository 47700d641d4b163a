use std::sync::Arc;

use auditcord_core::{
    AuditLog, AuditLogConfig, AuditLogError, AuditTarget, AuditValue, GlobalState, GuildSnapshot,
    GuildState,
};
use auditcord_models::audit_log::{AuditLogAction, AuditLogActionCategory, AuditLogPayload};
use auditcord_models::enums::VerificationLevel;
use auditcord_models::object::Snowflake;
use serde_json::{json, Value};

struct Harness {
    guild: Arc<GuildState>,
    global: Arc<GlobalState>,
}

impl Harness {
    fn new() -> anyhow::Result<Self> {
        let snapshot: GuildSnapshot = serde_json::from_value(json!({
            "id": "100",
            "name": "Harbor",
            "owner_id": "200",
            "icon": "a_1cef",
            "channels": [
                { "id": "300", "type": 0, "name": "lobby" },
                { "id": "301", "type": 2, "name": "voice" }
            ],
            "roles": [
                { "id": "100", "name": "@everyone", "permissions": "0" },
                { "id": "1", "name": "a", "color": 255, "permissions": "2048" }
            ],
            "members": [
                { "user": { "id": "200", "username": "captain" }, "roles": ["1"] }
            ]
        }))?;
        let global = GlobalState::new();
        global.insert_guild(snapshot.guild.clone());
        Ok(Self {
            guild: Arc::new(GuildState::from_snapshot(snapshot)),
            global: Arc::new(global),
        })
    }

    fn decode(&self, entries: Value) -> anyhow::Result<AuditLog> {
        let payload: AuditLogPayload = serde_json::from_value(json!({
            "audit_log_entries": entries,
            "users": [{ "id": "500", "username": "visitor" }]
        }))?;
        Ok(AuditLog::from_payload(
            payload,
            self.guild.clone(),
            self.global.clone(),
            AuditLogConfig::default(),
        )?)
    }
}

#[test]
fn unregistered_keys_pass_through_on_both_sides() -> anyhow::Result<()> {
    let harness = Harness::new()?;
    let log = harness.decode(json!([{
        "id": "1",
        "action_type": 11,
        "target_id": "300",
        "changes": [{ "key": "topic", "old_value": { "a": [1, 2] }, "new_value": "plain" }]
    }]))?;
    let changes = log.entries[0].changes()?;
    assert_eq!(changes.before.get("topic").and_then(AuditValue::as_raw), Some(&json!({ "a": [1, 2] })));
    assert_eq!(changes.after.get("topic").and_then(AuditValue::as_raw), Some(&json!("plain")));
    Ok(())
}

#[test]
fn one_sided_records_leave_the_other_side_none() -> anyhow::Result<()> {
    let harness = Harness::new()?;
    let log = harness.decode(json!([
        {
            "id": "1",
            "action_type": 10,
            "target_id": "300",
            "changes": [{ "key": "rate_limit_per_user", "new_value": 30 }]
        },
        {
            "id": "2",
            "action_type": 12,
            "target_id": "300",
            "changes": [{ "key": "rate_limit_per_user", "old_value": 30 }]
        }
    ]))?;
    let created = log.entries[0].changes()?;
    assert!(created.before.get("slowmode_delay").is_some_and(AuditValue::is_none));
    assert_eq!(created.after.get("slowmode_delay").and_then(AuditValue::as_i64), Some(30));

    let deleted = log.entries[1].changes()?;
    assert_eq!(deleted.before.get("slowmode_delay").and_then(AuditValue::as_i64), Some(30));
    assert!(deleted.after.get("slowmode_delay").is_some_and(AuditValue::is_none));
    Ok(())
}

#[test]
fn colour_spellings_agree() -> anyhow::Result<()> {
    let harness = Harness::new()?;
    let log = harness.decode(json!([{
        "id": "1",
        "action_type": 31,
        "target_id": "1",
        "changes": [{ "key": "color", "old_value": 255, "new_value": 65280 }]
    }]))?;
    let changes = log.entries[0].changes()?;
    for view in [&changes.before, &changes.after] {
        let colour = view.get("colour").map(ToString::to_string);
        let color = view.get("color").map(ToString::to_string);
        assert!(colour.is_some());
        assert_eq!(colour, color);
    }
    assert_eq!(changes.after.get("color").map(ToString::to_string).as_deref(), Some("#00ff00"));
    Ok(())
}

#[test]
fn role_add_resolves_and_stands_in() -> anyhow::Result<()> {
    let harness = Harness::new()?;
    let log = harness.decode(json!([{
        "id": "1",
        "action_type": 25,
        "user_id": "200",
        "target_id": "500",
        "changes": [{ "key": "$add", "new_value": [{ "id": "1", "name": "a" }, { "id": "2", "name": "b" }] }]
    }]))?;
    let entry = &log.entries[0];
    assert!(!entry.before()?.contains("roles"));

    let after = entry.after()?;
    let roles = after.get("roles").and_then(AuditValue::as_list).expect("roles list");
    let first = roles[0].as_role().expect("role");
    assert!(first.is_cached());
    assert_eq!(first.id(), 1);
    let second = roles[1].as_role().expect("role");
    assert!(!second.is_cached());
    assert_eq!(second.id(), 2);
    assert_eq!(second.object().and_then(|o| o.name.as_deref()), Some("b"));
    Ok(())
}

#[test]
fn unknown_enum_values_are_marked() -> anyhow::Result<()> {
    let harness = Harness::new()?;
    let log = harness.decode(json!([{
        "id": "1",
        "action_type": 1,
        "target_id": "100",
        "changes": [{ "key": "verification_level", "old_value": 1, "new_value": 999 }]
    }]))?;
    let after = log.entries[0].after()?;
    match after.get("verification_level") {
        Some(AuditValue::VerificationLevel(level)) => {
            assert_eq!(*level, VerificationLevel::Unknown(999));
            assert_eq!(level.to_string(), "unknown(999)");
        }
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[test]
fn invite_target_side_follows_the_action() -> anyhow::Result<()> {
    let harness = Harness::new()?;
    let log = harness.decode(json!([
        {
            "id": "1",
            "action_type": 42,
            "changes": [
                { "key": "code", "old_value": "gone" },
                { "key": "channel_id", "old_value": "300" },
                { "key": "max_uses", "old_value": 5 }
            ]
        },
        {
            "id": "2",
            "action_type": 40,
            "changes": [
                { "key": "code", "new_value": "fresh" },
                { "key": "inviter_id", "new_value": "500" },
                { "key": "max_uses", "new_value": 0 }
            ]
        }
    ]))?;

    let Some(AuditTarget::Invite(deleted)) = log.entries[0].target()? else {
        panic!("expected invite target");
    };
    assert_eq!(deleted.code, "gone");
    assert_eq!(deleted.max_uses, Some(5));
    assert_eq!(deleted.guild_id, Some(100));
    assert_eq!(deleted.channel.as_ref().map(Snowflake::id), Some(300));

    let Some(AuditTarget::Invite(created)) = log.entries[1].target()? else {
        panic!("expected invite target");
    };
    assert_eq!(created.code, "fresh");
    assert_eq!(created.url(), "https://discord.gg/fresh");
    assert_eq!(created.inviter.as_ref().map(|u| u.user().username.as_str()), Some("visitor"));
    Ok(())
}

#[test]
fn member_prune_extra_exposes_counts() -> anyhow::Result<()> {
    let harness = Harness::new()?;
    let log = harness.decode(json!([{
        "id": "1",
        "action_type": 21,
        "user_id": "200",
        "options": { "delete_member_days": 7, "members_removed": 3 }
    }]))?;
    let extra = &log.entries[0].extra;
    assert_eq!(extra.delete_member_days(), Some(7));
    assert_eq!(extra.members_removed(), Some(3));
    Ok(())
}

#[test]
fn category_depends_only_on_action() -> anyhow::Result<()> {
    let harness = Harness::new()?;
    let log = harness.decode(json!([
        { "id": "1", "action_type": 10, "target_id": "300" },
        { "id": "2", "action_type": 10, "target_id": "999", "changes": [{ "key": "name", "new_value": "x" }] },
        { "id": "3", "action_type": 72, "target_id": "500", "options": { "channel_id": "300", "count": "2" } },
        { "id": "4", "action_type": 999 }
    ]))?;

    for entry in &log {
        let first = entry.category();
        entry.changes()?;
        entry.target()?;
        assert_eq!(entry.category(), first);
        assert_eq!(first, entry.action.category());
    }
    assert_eq!(log.entries[0].category(), Some(AuditLogActionCategory::Create));
    assert_eq!(log.entries[2].category(), Some(AuditLogActionCategory::Delete));
    assert_eq!(log.entries[3].category(), None);
    assert_eq!(log.entries[2].action, AuditLogAction::MessageDelete);
    Ok(())
}

#[test]
fn guild_assets_use_configured_cdn() -> anyhow::Result<()> {
    let harness = Harness::new()?;
    let payload: AuditLogPayload = serde_json::from_value(json!({
        "audit_log_entries": [{
            "id": "1",
            "action_type": 1,
            "target_id": "100",
            "changes": [
                { "key": "icon_hash", "old_value": null, "new_value": "a_1cef" },
                { "key": "owner_id", "old_value": "500", "new_value": "200" },
                { "key": "afk_channel_id", "new_value": "301" }
            ]
        }]
    }))?;
    let config = AuditLogConfig {
        cdn_base_url: "https://media.example.test/".into(),
        asset_size: 256,
    };
    let log = AuditLog::from_payload(payload, harness.guild.clone(), harness.global.clone(), config)?;
    let entry = &log.entries[0];
    let changes = entry.changes()?;

    assert!(changes.before.get("icon").is_some_and(AuditValue::is_none));
    match changes.after.get("icon") {
        Some(AuditValue::Asset(asset)) => {
            assert_eq!(asset.url, "https://media.example.test/icons/100/a_1cef.gif?size=256");
        }
        other => panic!("unexpected {other:?}"),
    }
    // user 500 is only known from the payload
    assert!(changes.before.get("owner").and_then(AuditValue::as_user).is_some());
    assert!(changes.after.get("owner").and_then(AuditValue::as_user).and_then(|u| u.member()).is_some());
    assert_eq!(
        changes.after.get("afk_channel").and_then(AuditValue::as_channel).map(Snowflake::id),
        Some(301)
    );
    assert!(matches!(entry.target()?, Some(AuditTarget::Guild(g)) if g.name == "Harbor"));
    Ok(())
}

#[test]
fn broken_options_name_action_and_key() -> anyhow::Result<()> {
    let harness = Harness::new()?;
    let err = harness
        .decode(json!([{ "id": "1", "action_type": 74, "options": { "channel_id": "300" } }]))
        .unwrap_err();
    let err = err.downcast::<AuditLogError>()?;
    assert_eq!(err.to_string(), "message_pin entry is missing option `message_id`");
    Ok(())
}
