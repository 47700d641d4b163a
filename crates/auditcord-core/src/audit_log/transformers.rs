//! Per-key decoding of raw change values.
//!
//! [`lookup`] returns the optional output rename and optional transformer for
//! a change key. Keys that are not registered pass through untouched.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

use auditcord_models::asset::Asset;
use auditcord_models::auto_moderation::{AutoModerationAction, AutoModerationTriggerMetadata};
use auditcord_models::colour::Colour;
use auditcord_models::enums::{
    AutoModerationEventType, AutoModerationTriggerType, ChannelType, ContentFilter,
    NotificationLevel, ScheduledEventEntityType, StagePrivacyLevel, StickerFormatType,
    StickerType, TolerantEnum, VerificationLevel, VideoQualityMode, VoiceRegion,
};
use auditcord_models::object::{Object, Resolved};
use auditcord_models::permissions::{
    ChannelOverwrite, OverwriteType, PermissionOverwrite, Permissions,
};
use auditcord_util::snowflake;

use super::entry::AuditLogEntry;
use super::value::{AuditValue, OverwriteTarget};
use crate::error::TransformError;

pub type Transformer = fn(&AuditLogEntry, &Value) -> Result<AuditValue, TransformError>;

/// How one change key is decoded. Both halves are optional.
#[derive(Clone, Copy)]
pub struct FieldTransform {
    pub rename: Option<&'static str>,
    pub transform: Option<Transformer>,
}

const fn field(rename: Option<&'static str>, transform: Option<Transformer>) -> FieldTransform {
    FieldTransform { rename, transform }
}

#[rustfmt::skip]
static TRANSFORMERS: &[(&str, FieldTransform)] = &[
    ("verification_level",            field(None, Some(transform_enum::<VerificationLevel>))),
    ("explicit_content_filter",       field(None, Some(transform_enum::<ContentFilter>))),
    ("allow",                         field(None, Some(transform_permissions))),
    ("deny",                          field(None, Some(transform_permissions))),
    ("permissions",                   field(None, Some(transform_permissions))),
    ("id",                            field(None, Some(transform_snowflake))),
    ("color",                         field(Some("colour"), Some(transform_colour))),
    ("owner_id",                      field(Some("owner"), Some(transform_member_id))),
    ("inviter_id",                    field(Some("inviter"), Some(transform_member_id))),
    ("channel_id",                    field(Some("channel"), Some(transform_channel))),
    ("afk_channel_id",                field(Some("afk_channel"), Some(transform_channel))),
    ("system_channel_id",             field(Some("system_channel"), Some(transform_channel))),
    ("widget_channel_id",             field(Some("widget_channel"), Some(transform_channel))),
    ("rules_channel_id",              field(Some("rules_channel"), Some(transform_channel))),
    ("public_updates_channel_id",     field(Some("public_updates_channel"), Some(transform_channel))),
    ("permission_overwrites",         field(Some("overwrites"), Some(transform_overwrites))),
    ("splash_hash",                   field(Some("splash"), Some(transform_splash))),
    ("banner_hash",                   field(Some("banner"), Some(transform_banner))),
    ("discovery_splash_hash",         field(Some("discovery_splash"), Some(transform_discovery_splash))),
    ("icon_hash",                     field(Some("icon"), Some(transform_icon))),
    ("avatar_hash",                   field(Some("avatar"), Some(transform_avatar))),
    ("rate_limit_per_user",           field(Some("slowmode_delay"), None)),
    ("guild_id",                      field(Some("guild"), Some(transform_guild_id))),
    ("tags",                          field(Some("emoji"), None)),
    ("default_message_notifications", field(Some("default_notifications"), Some(transform_enum::<NotificationLevel>))),
    ("region",                        field(None, Some(transform_voice_region))),
    ("rtc_region",                    field(None, Some(transform_voice_region))),
    ("video_quality_mode",            field(None, Some(transform_enum::<VideoQualityMode>))),
    ("privacy_level",                 field(None, Some(transform_enum::<StagePrivacyLevel>))),
    ("format_type",                   field(None, Some(transform_enum::<StickerFormatType>))),
    ("entity_type",                   field(None, Some(transform_enum::<ScheduledEventEntityType>))),
    ("type",                          field(None, Some(transform_type))),
    ("trigger_type",                  field(None, Some(transform_enum::<AutoModerationTriggerType>))),
    ("event_type",                    field(None, Some(transform_enum::<AutoModerationEventType>))),
    ("actions",                       field(None, Some(transform_auto_moderation_actions))),
    ("trigger_metadata",              field(None, Some(transform_trigger_metadata))),
    ("exempt_roles",                  field(None, Some(transform_exempt_roles))),
    ("exempt_channels",               field(None, Some(transform_exempt_channels))),
];

static REGISTRY: LazyLock<HashMap<&'static str, FieldTransform>> =
    LazyLock::new(|| TRANSFORMERS.iter().copied().collect());

pub fn lookup(key: &str) -> Option<FieldTransform> {
    REGISTRY.get(key).copied()
}

fn read_snowflake(data: &Value) -> Result<i64, TransformError> {
    snowflake::from_value(data).ok_or_else(|| TransformError::unexpected("a snowflake", data))
}

fn read_int(data: &Value) -> Result<i64, TransformError> {
    match data {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| TransformError::unexpected("an integer", data))
}

fn read_str(data: &Value) -> Result<&str, TransformError> {
    data.as_str()
        .ok_or_else(|| TransformError::unexpected("a string", data))
}

fn transform_snowflake(_entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    read_snowflake(data).map(AuditValue::Int)
}

fn transform_permissions(_entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    let perms = match data {
        Value::Null => return Ok(AuditValue::None),
        Value::String(raw) => Permissions::from_wire(raw),
        Value::Number(n) => n.as_u64().map(Permissions::from_bits_retain),
        _ => None,
    };
    perms
        .map(AuditValue::Permissions)
        .ok_or_else(|| TransformError::unexpected("a permission bitset", data))
}

fn transform_colour(_entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    let value = read_int(data)?;
    u32::try_from(value)
        .map(|v| AuditValue::Colour(Colour::new(v)))
        .map_err(|_| TransformError::unexpected("a colour value", data))
}

fn transform_member_id(entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    let id = read_snowflake(data)?;
    Ok(entry
        .member_or_user(id)
        .map(AuditValue::User)
        .unwrap_or(AuditValue::None))
}

fn transform_channel(entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    let id = read_snowflake(data)?;
    Ok(AuditValue::Channel(Resolved::or_object(
        entry.guild().channel_or_thread(id),
        id,
    )))
}

fn transform_role(entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    let id = read_snowflake(data)?;
    Ok(AuditValue::Role(Resolved::or_object(entry.guild().role(id), id)))
}

fn transform_guild_id(entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    let id = read_snowflake(data)?;
    Ok(entry
        .global()
        .guild(id)
        .map(|guild| AuditValue::Guild(Box::new(guild)))
        .unwrap_or(AuditValue::None))
}

/// Resolve an overwrite's target: `Role` through the role cache, `Member` through
/// the member/user lookup, and a stand-in for unknown tags or cache misses.
pub(crate) fn resolve_overwrite_target(
    entry: &AuditLogEntry,
    kind: OverwriteType,
    id: i64,
    role_name: Option<&str>,
) -> OverwriteTarget {
    match kind {
        OverwriteType::Role => OverwriteTarget::Role(match entry.guild().role(id) {
            Some(role) => Resolved::Cached(role),
            None => Resolved::Object(Object {
                id,
                name: role_name.map(str::to_string),
            }),
        }),
        OverwriteType::Member => entry
            .member_or_user(id)
            .map(OverwriteTarget::Member)
            .unwrap_or_else(|| OverwriteTarget::Object(Object::new(id))),
        OverwriteType::Unknown => OverwriteTarget::Object(Object::new(id)),
    }
}

fn transform_overwrites(entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    let raw: Vec<ChannelOverwrite> = serde_json::from_value(data.clone())?;
    let overwrites = raw
        .into_iter()
        .map(|ow| {
            let target = resolve_overwrite_target(entry, ow.kind, ow.id, None);
            (target, PermissionOverwrite::from_pair(ow.allow, ow.deny))
        })
        .collect();
    Ok(AuditValue::Overwrites(overwrites))
}

fn transform_icon(entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    let config = entry.config();
    let hash = read_str(data)?;
    Ok(AuditValue::Asset(Asset::guild_icon(
        &config.cdn_base_url,
        entry.guild().guild().id,
        hash,
        config.asset_size,
    )))
}

/// Avatars belong to the entry's target; without a target id the hash is kept raw.
fn transform_avatar(entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    let hash = read_str(data)?;
    let Some(target_id) = entry.target_id else {
        return Ok(AuditValue::Raw(data.clone()));
    };
    let config = entry.config();
    Ok(AuditValue::Asset(Asset::avatar(
        &config.cdn_base_url,
        target_id,
        hash,
        config.asset_size,
    )))
}

fn guild_image(entry: &AuditLogEntry, data: &Value, path: &str) -> Result<AuditValue, TransformError> {
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    let config = entry.config();
    let hash = read_str(data)?;
    Ok(AuditValue::Asset(Asset::guild_image(
        &config.cdn_base_url,
        entry.guild().guild().id,
        hash,
        path,
        config.asset_size,
    )))
}

fn transform_splash(entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    guild_image(entry, data, "splashes")
}

fn transform_banner(entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    guild_image(entry, data, "banners")
}

fn transform_discovery_splash(entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    guild_image(entry, data, "discovery-splashes")
}

fn transform_enum<E>(_entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError>
where
    E: TolerantEnum + Into<AuditValue>,
{
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    let decoded = E::from_value(read_int(data)?);
    if decoded.is_unknown() {
        tracing::debug!(kind = E::NAME, value = decoded.value(), "unrecognized enum value");
    }
    Ok(decoded.into())
}

fn transform_voice_region(_entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    let region = VoiceRegion::from_value(read_str(data)?);
    if region.is_unknown() {
        tracing::debug!(kind = "VoiceRegion", value = %region, "unrecognized enum value");
    }
    Ok(AuditValue::VoiceRegion(region))
}

/// `type` means a sticker type on sticker actions and a channel type everywhere else.
fn transform_type(entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    if entry.action.is_sticker() {
        transform_enum::<StickerType>(entry, data)
    } else {
        transform_enum::<ChannelType>(entry, data)
    }
}

fn transform_auto_moderation_action(
    _entry: &AuditLogEntry,
    data: &Value,
) -> Result<AuditValue, TransformError> {
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    let action: AutoModerationAction = serde_json::from_value(data.clone())?;
    Ok(AuditValue::AutoModerationAction(action))
}

fn transform_trigger_metadata(
    _entry: &AuditLogEntry,
    data: &Value,
) -> Result<AuditValue, TransformError> {
    if data.is_null() {
        return Ok(AuditValue::None);
    }
    let metadata: AutoModerationTriggerMetadata = serde_json::from_value(data.clone())?;
    Ok(AuditValue::TriggerMetadata(metadata))
}

/// Apply `inner` to every non-null element of a list value.
fn list_of(
    entry: &AuditLogEntry,
    data: &Value,
    inner: Transformer,
) -> Result<AuditValue, TransformError> {
    let items = match data {
        Value::Null => return Ok(AuditValue::List(Vec::new())),
        Value::Array(items) => items,
        other => return Err(TransformError::unexpected("a list", other)),
    };
    items
        .iter()
        .filter(|item| !item.is_null())
        .map(|item| inner(entry, item))
        .collect::<Result<Vec<_>, _>>()
        .map(AuditValue::List)
}

fn transform_auto_moderation_actions(
    entry: &AuditLogEntry,
    data: &Value,
) -> Result<AuditValue, TransformError> {
    list_of(entry, data, transform_auto_moderation_action)
}

fn transform_exempt_roles(entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    list_of(entry, data, transform_role)
}

fn transform_exempt_channels(entry: &AuditLogEntry, data: &Value) -> Result<AuditValue, TransformError> {
    list_of(entry, data, transform_channel)
}
