use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;

use auditcord_core::{AuditLogChanges, AuditLogEntry, AuditLogExtra, AuditTarget, DiffView};
use auditcord_models::audit_log::AuditLogActionCategory;

use crate::config::{OutputConfig, OutputFormat};

/// JSON shape of one printed entry.
#[derive(Debug, Serialize)]
struct EntryReport<'a> {
    #[serde(with = "auditcord_util::snowflake::string")]
    id: i64,
    action: &'static str,
    action_type: i64,
    category: Option<AuditLogActionCategory>,
    created_at: DateTime<Utc>,
    #[serde(with = "auditcord_util::snowflake::option")]
    user_id: Option<i64>,
    #[serde(with = "auditcord_util::snowflake::option")]
    target_id: Option<i64>,
    reason: Option<&'a str>,
    extra: &'a AuditLogExtra,
    target: Option<&'a AuditTarget>,
    before: Option<&'a DiffView>,
    after: Option<&'a DiffView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

pub fn render(entries: &[AuditLogEntry], output: &OutputConfig) -> Result<String> {
    match output.format {
        OutputFormat::Text => Ok(render_text(entries, output.show_unchanged)),
        OutputFormat::Json => render_json(entries),
    }
}

fn render_json(entries: &[AuditLogEntry]) -> Result<String> {
    let changes: Vec<_> = entries.iter().map(AuditLogEntry::changes).collect();
    let targets: Vec<_> = entries.iter().map(AuditLogEntry::target).collect();

    let reports: Vec<EntryReport<'_>> = entries
        .iter()
        .zip(&changes)
        .zip(&targets)
        .map(|((entry, changes), target)| {
            let mut errors = Vec::new();
            let changes = changes.as_ref().map_err(|e| errors.push(e.to_string())).ok();
            let target = match target {
                Ok(target) => *target,
                Err(e) => {
                    errors.push(e.to_string());
                    None
                }
            };
            EntryReport {
                id: entry.id,
                action: entry.action.name(),
                action_type: auditcord_models::enums::TolerantEnum::value(entry.action),
                category: entry.category(),
                created_at: entry.created_at(),
                user_id: entry.user_id,
                target_id: entry.target_id,
                reason: entry.reason.as_deref(),
                extra: &entry.extra,
                target,
                before: changes.map(|c| &c.before),
                after: changes.map(|c| &c.after),
                errors,
            }
        })
        .collect();
    Ok(serde_json::to_string_pretty(&reports)?)
}

fn render_text(entries: &[AuditLogEntry], show_unchanged: bool) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = write!(
            out,
            "{} {} {}",
            entry.created_at().format("%Y-%m-%d %H:%M:%S"),
            entry.id,
            entry.action
        );
        match &entry.user {
            Some(user) => {
                let _ = write!(out, " by {}", user.display_name());
            }
            None => {
                if let Some(id) = entry.user_id {
                    let _ = write!(out, " by <user {id}>");
                }
            }
        }
        match entry.target() {
            Ok(Some(target)) => {
                let _ = write!(out, " on {}", describe_target(target));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(entry_id = entry.id, "target unavailable: {e}");
                let _ = write!(out, " on <unresolved>");
            }
        }
        out.push('\n');

        if let Some(reason) = &entry.reason {
            let _ = writeln!(out, "    reason: {reason}");
        }
        if let Some(extra) = describe_extra(&entry.extra) {
            let _ = writeln!(out, "    {extra}");
        }
        match entry.changes() {
            Ok(changes) => write_changes(&mut out, &changes, show_unchanged),
            Err(e) => {
                tracing::warn!(entry_id = entry.id, "changes unavailable: {e}");
                let _ = writeln!(out, "    changes unavailable: {e}");
            }
        }
    }
    out
}

fn write_changes(out: &mut String, changes: &AuditLogChanges, show_unchanged: bool) {
    let changed: Vec<&str> = changes.changed_keys().collect();
    for attr in changes.after.keys() {
        if !show_unchanged && !changed.contains(&attr) {
            continue;
        }
        let before = changes.before.get(attr).map(ToString::to_string);
        let after = changes.after.get(attr).map(ToString::to_string);
        let _ = writeln!(
            out,
            "    {attr}: {} -> {}",
            before.as_deref().unwrap_or("None"),
            after.as_deref().unwrap_or("None")
        );
    }
    // `$remove` only populates the before side.
    for attr in changes.before.keys().filter(|a| !changes.after.contains(a)) {
        if let Some(value) = changes.before.get(attr) {
            let _ = writeln!(out, "    {attr}: {value} -> None");
        }
    }
}

fn describe_target(target: &AuditTarget) -> String {
    match target {
        AuditTarget::Guild(guild) => format!("guild {}", guild.name),
        AuditTarget::Channel(channel) | AuditTarget::Thread(channel) => {
            format!("#{}", channel.name.as_deref().unwrap_or("unknown"))
        }
        AuditTarget::User(user) => user.display_name().to_string(),
        AuditTarget::Role(role) => format!("@{}", role.name),
        AuditTarget::Invite(invite) => invite.url(),
        AuditTarget::Emoji(emoji) => format!(":{}:", emoji.name),
        AuditTarget::StageInstance(instance) => format!("stage \"{}\"", instance.topic),
        AuditTarget::Sticker(sticker) => format!("sticker {}", sticker.name),
        AuditTarget::AutoModerationRule(rule) => format!("rule \"{}\"", rule.name),
        AuditTarget::Object(object) => format!("<{}>", object.id),
    }
}

fn describe_extra(extra: &AuditLogExtra) -> Option<String> {
    use auditcord_models::object::Snowflake;

    let mut parts = Vec::new();
    if let Some(channel) = extra.channel() {
        parts.push(format!("channel={}", channel.id()));
    }
    if let Some(count) = extra.count() {
        parts.push(format!("count={count}"));
    }
    if let (Some(days), Some(removed)) = (extra.delete_member_days(), extra.members_removed()) {
        parts.push(format!("delete_member_days={days} members_removed={removed}"));
    }
    if let Some(message_id) = extra.message_id() {
        parts.push(format!("message_id={message_id}"));
    }
    if let Some(target) = extra.overwrite_target() {
        parts.push(format!("overwrite_target={}", target.id()));
    }
    if let Some(rule) = extra.rule_name() {
        parts.push(format!("rule={rule}"));
    }
    if let Some(trigger) = extra.rule_trigger_type() {
        parts.push(format!("trigger={trigger}"));
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}
