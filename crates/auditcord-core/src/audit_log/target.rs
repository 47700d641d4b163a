use serde::Serialize;

use auditcord_models::audit_log::{AuditLogAction, TargetType};
use auditcord_models::auto_moderation::AutoModerationRule;
use auditcord_models::channel::Channel;
use auditcord_models::emoji::Emoji;
use auditcord_models::guild::Guild;
use auditcord_models::invite::Invite;
use auditcord_models::member::MemberOrUser;
use auditcord_models::object::{Object, Snowflake};
use auditcord_models::role::Role;
use auditcord_models::stage_instance::StageInstance;
use auditcord_models::sticker::GuildSticker;

use super::entry::AuditLogEntry;
use super::value::AuditValue;
use crate::error::AuditLogError;

/// The entity an audit-log entry acted upon.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AuditTarget {
    Guild(Box<Guild>),
    Channel(Channel),
    Thread(Channel),
    User(MemberOrUser),
    Role(Role),
    Invite(Invite),
    Emoji(Emoji),
    StageInstance(StageInstance),
    Sticker(GuildSticker),
    AutoModerationRule(AutoModerationRule),
    /// Id-only stand-in for targets that are not cached or have no resolver.
    Object(Object),
}

impl AuditTarget {
    /// Invites are keyed by code and have no id.
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Guild(guild) => Some(guild.id),
            Self::Channel(channel) | Self::Thread(channel) => Some(channel.id),
            Self::User(user) => Some(user.id()),
            Self::Role(role) => Some(role.id),
            Self::Invite(_) => None,
            Self::Emoji(emoji) => Some(emoji.id),
            Self::StageInstance(instance) => Some(instance.id),
            Self::Sticker(sticker) => Some(sticker.id),
            Self::AutoModerationRule(rule) => Some(rule.id),
            Self::Object(object) => Some(object.id),
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }
}

pub type TargetResolver =
    fn(&AuditLogEntry, Option<i64>) -> Result<Option<AuditTarget>, AuditLogError>;

/// Resolver for each target type; `None` where only a stand-in is possible.
pub fn resolver(target_type: TargetType) -> Option<TargetResolver> {
    match target_type {
        TargetType::Guild => Some(resolve_guild),
        TargetType::Channel => Some(resolve_channel),
        TargetType::User | TargetType::Message => Some(resolve_user),
        TargetType::Role => Some(resolve_role),
        TargetType::Invite => Some(resolve_invite),
        TargetType::Emoji => Some(resolve_emoji),
        TargetType::StageInstance => Some(resolve_stage_instance),
        TargetType::Sticker => Some(resolve_sticker),
        TargetType::Thread => Some(resolve_thread),
        TargetType::AutoModerationRule => Some(resolve_auto_moderation_rule),
        TargetType::Webhook
        | TargetType::Integration
        | TargetType::ScheduledEvent
        | TargetType::ApplicationCommand => None,
    }
}

pub(crate) fn resolve(entry: &AuditLogEntry) -> Result<Option<AuditTarget>, AuditLogError> {
    match entry.action.target_type().and_then(resolver) {
        Some(resolve) => resolve(entry, entry.target_id),
        None => Ok(stand_in(entry.target_id)),
    }
}

fn stand_in(id: Option<i64>) -> Option<AuditTarget> {
    id.map(|id| AuditTarget::Object(Object::new(id)))
}

fn cached_or_stand_in<T>(
    id: Option<i64>,
    lookup: impl FnOnce(i64) -> Option<T>,
    wrap: fn(T) -> AuditTarget,
) -> Result<Option<AuditTarget>, AuditLogError> {
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(Some(lookup(id).map(wrap).unwrap_or_else(|| AuditTarget::Object(Object::new(id)))))
}

fn resolve_guild(entry: &AuditLogEntry, _id: Option<i64>) -> Result<Option<AuditTarget>, AuditLogError> {
    Ok(Some(AuditTarget::Guild(Box::new(entry.guild().guild().clone()))))
}

fn resolve_channel(entry: &AuditLogEntry, id: Option<i64>) -> Result<Option<AuditTarget>, AuditLogError> {
    cached_or_stand_in(id, |id| entry.guild().channel(id), AuditTarget::Channel)
}

fn resolve_thread(entry: &AuditLogEntry, id: Option<i64>) -> Result<Option<AuditTarget>, AuditLogError> {
    cached_or_stand_in(id, |id| entry.guild().thread(id), AuditTarget::Thread)
}

fn resolve_role(entry: &AuditLogEntry, id: Option<i64>) -> Result<Option<AuditTarget>, AuditLogError> {
    cached_or_stand_in(id, |id| entry.guild().role(id), AuditTarget::Role)
}

fn resolve_stage_instance(entry: &AuditLogEntry, id: Option<i64>) -> Result<Option<AuditTarget>, AuditLogError> {
    cached_or_stand_in(id, |id| entry.guild().stage_instance(id), AuditTarget::StageInstance)
}

fn resolve_emoji(entry: &AuditLogEntry, id: Option<i64>) -> Result<Option<AuditTarget>, AuditLogError> {
    cached_or_stand_in(id, |id| entry.global().emoji(id), AuditTarget::Emoji)
}

fn resolve_sticker(entry: &AuditLogEntry, id: Option<i64>) -> Result<Option<AuditTarget>, AuditLogError> {
    cached_or_stand_in(id, |id| entry.global().sticker(id), AuditTarget::Sticker)
}

fn resolve_auto_moderation_rule(
    entry: &AuditLogEntry,
    id: Option<i64>,
) -> Result<Option<AuditTarget>, AuditLogError> {
    cached_or_stand_in(
        id,
        |id| entry.auto_moderation_rule(id).cloned(),
        AuditTarget::AutoModerationRule,
    )
}

/// Users and message authors have no stand-in: a miss is `None`.
fn resolve_user(entry: &AuditLogEntry, id: Option<i64>) -> Result<Option<AuditTarget>, AuditLogError> {
    Ok(id
        .and_then(|id| entry.member_or_user(id))
        .map(AuditTarget::User))
}

/// Invites are rebuilt from the change views: `before` when deleted, `after` otherwise.
fn resolve_invite(entry: &AuditLogEntry, _id: Option<i64>) -> Result<Option<AuditTarget>, AuditLogError> {
    let changes = entry.changes()?;
    let view = if entry.action == AuditLogAction::InviteDelete {
        &changes.before
    } else {
        &changes.after
    };

    let code = view
        .get("code")
        .and_then(AuditValue::as_str)
        .ok_or(AuditLogError::MissingChange { key: "code" })?;

    let invite = Invite {
        code: code.to_string(),
        guild_id: Some(entry.guild().guild().id),
        channel: view.get("channel").and_then(AuditValue::as_channel).cloned(),
        inviter: view.get("inviter").and_then(AuditValue::as_user).cloned(),
        uses: view.get("uses").and_then(AuditValue::as_i64),
        max_uses: view.get("max_uses").and_then(AuditValue::as_i64),
        max_age: view.get("max_age").and_then(AuditValue::as_i64),
        temporary: view.get("temporary").and_then(AuditValue::as_bool),
    };
    Ok(Some(AuditTarget::Invite(invite)))
}
