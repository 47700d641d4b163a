//! Decoding of the per-action `options` blob.

use serde::Serialize;
use serde_json::{Map, Value};

use auditcord_models::audit_log::AuditLogAction;
use auditcord_models::enums::{AutoModerationTriggerType, TolerantEnum};
use auditcord_models::object::{ChannelRef, Resolved};
use auditcord_models::permissions::OverwriteType;
use auditcord_util::snowflake;

use super::entry::AuditLogEntry;
use super::transformers::resolve_overwrite_target;
use super::value::OverwriteTarget;
use crate::error::AuditLogError;

/// Action-specific context attached to an entry.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditLogExtra {
    #[default]
    Empty,
    MemberPrune {
        channel: Option<ChannelRef>,
        delete_member_days: i64,
        members_removed: i64,
    },
    MemberMoveOrMessageDelete {
        channel: Option<ChannelRef>,
        count: i64,
    },
    MemberDisconnect {
        channel: Option<ChannelRef>,
        count: i64,
    },
    Pin {
        channel: ChannelRef,
        message_id: i64,
    },
    Overwrite {
        target: OverwriteTarget,
    },
    StageInstance {
        channel: ChannelRef,
    },
    AutoModeration {
        channel: Option<ChannelRef>,
        rule_name: String,
        rule_trigger_type: AutoModerationTriggerType,
    },
    Channel {
        channel: ChannelRef,
    },
}

impl AuditLogExtra {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn channel(&self) -> Option<&ChannelRef> {
        match self {
            Self::MemberPrune { channel, .. }
            | Self::MemberMoveOrMessageDelete { channel, .. }
            | Self::MemberDisconnect { channel, .. }
            | Self::AutoModeration { channel, .. } => channel.as_ref(),
            Self::Pin { channel, .. }
            | Self::StageInstance { channel }
            | Self::Channel { channel } => Some(channel),
            _ => None,
        }
    }

    pub fn count(&self) -> Option<i64> {
        match self {
            Self::MemberMoveOrMessageDelete { count, .. } | Self::MemberDisconnect { count, .. } => {
                Some(*count)
            }
            _ => None,
        }
    }

    pub fn delete_member_days(&self) -> Option<i64> {
        match self {
            Self::MemberPrune { delete_member_days, .. } => Some(*delete_member_days),
            _ => None,
        }
    }

    pub fn members_removed(&self) -> Option<i64> {
        match self {
            Self::MemberPrune { members_removed, .. } => Some(*members_removed),
            _ => None,
        }
    }

    pub fn message_id(&self) -> Option<i64> {
        match self {
            Self::Pin { message_id, .. } => Some(*message_id),
            _ => None,
        }
    }

    pub fn overwrite_target(&self) -> Option<&OverwriteTarget> {
        match self {
            Self::Overwrite { target } => Some(target),
            _ => None,
        }
    }

    pub fn rule_name(&self) -> Option<&str> {
        match self {
            Self::AutoModeration { rule_name, .. } => Some(rule_name),
            _ => None,
        }
    }

    pub fn rule_trigger_type(&self) -> Option<AutoModerationTriggerType> {
        match self {
            Self::AutoModeration { rule_trigger_type, .. } => Some(*rule_trigger_type),
            _ => None,
        }
    }
}

/// Typed reads out of an options blob, failing with the entry's action.
struct Options<'a> {
    action: AuditLogAction,
    raw: &'a Map<String, Value>,
}

impl<'a> Options<'a> {
    fn get(&self, key: &'static str) -> Option<&'a Value> {
        self.raw.get(key).filter(|v| !v.is_null())
    }

    fn require(&self, key: &'static str) -> Result<&'a Value, AuditLogError> {
        self.get(key).ok_or(AuditLogError::MissingOption {
            action: self.action,
            key,
        })
    }

    fn invalid(&self, key: &'static str, value: &Value) -> AuditLogError {
        AuditLogError::InvalidOption {
            action: self.action,
            key,
            value: value.clone(),
        }
    }

    fn int(&self, key: &'static str) -> Result<i64, AuditLogError> {
        let value = self.require(key)?;
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
        .ok_or_else(|| self.invalid(key, value))
    }

    fn snowflake(&self, key: &'static str) -> Result<i64, AuditLogError> {
        let value = self.require(key)?;
        snowflake::from_value(value).ok_or_else(|| self.invalid(key, value))
    }

    fn optional_snowflake(&self, key: &'static str) -> Result<Option<i64>, AuditLogError> {
        self.get(key)
            .map(|value| snowflake::from_value(value).ok_or_else(|| self.invalid(key, value)))
            .transpose()
    }

    fn string(&self, key: &'static str) -> Result<String, AuditLogError> {
        let value = self.require(key)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.invalid(key, value))
    }
}

pub(crate) fn decode(
    entry: &AuditLogEntry,
    options: Option<&Map<String, Value>>,
) -> Result<AuditLogExtra, AuditLogError> {
    use AuditLogAction::*;

    let Some(raw) = options.filter(|o| !o.is_empty()) else {
        return Ok(AuditLogExtra::Empty);
    };
    let action = entry.action;
    let opts = Options { action, raw };
    let channel = |id: i64| Resolved::or_object(entry.guild().channel_or_thread(id), id);

    let extra = match action {
        MemberPrune => AuditLogExtra::MemberPrune {
            channel: opts.optional_snowflake("channel_id")?.map(channel),
            delete_member_days: opts.int("delete_member_days")?,
            members_removed: opts.int("members_removed")?,
        },
        MemberMove | MessageDelete | MessageBulkDelete => {
            AuditLogExtra::MemberMoveOrMessageDelete {
                channel: opts.optional_snowflake("channel_id")?.map(channel),
                count: opts.int("count")?,
            }
        }
        MemberDisconnect => AuditLogExtra::MemberDisconnect {
            channel: opts.optional_snowflake("channel_id")?.map(channel),
            count: opts.int("count")?,
        },
        a if a.is_pin() => AuditLogExtra::Pin {
            channel: channel(opts.snowflake("channel_id")?),
            message_id: opts.snowflake("message_id")?,
        },
        a if a.is_overwrite() => {
            let id = opts.snowflake("id")?;
            let kind = OverwriteType::from_value(opts.get("type").unwrap_or(&Value::Null));
            let role_name = opts.get("role_name").and_then(Value::as_str);
            AuditLogExtra::Overwrite {
                target: resolve_overwrite_target(entry, kind, id, role_name),
            }
        }
        a if a.is_stage_instance() => AuditLogExtra::StageInstance {
            channel: channel(opts.snowflake("channel_id")?),
        },
        a if a.is_auto_moderation_enforcement() => AuditLogExtra::AutoModeration {
            channel: opts.optional_snowflake("channel_id")?.map(channel),
            rule_name: opts.string("auto_moderation_rule_name")?,
            rule_trigger_type: AutoModerationTriggerType::from_value(
                opts.int("auto_moderation_rule_trigger_type")?,
            ),
        },
        _ => match opts.optional_snowflake("channel_id")? {
            Some(id) => AuditLogExtra::Channel {
                channel: channel(id),
            },
            None => AuditLogExtra::Empty,
        },
    };
    Ok(extra)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit_log::testing::{entry_with, fixture};
    use auditcord_models::object::Snowflake;
    use serde_json::json;

    fn extra(action: AuditLogAction, options: Value) -> Result<AuditLogExtra, AuditLogError> {
        let entry = entry_with(&fixture(), action, json!({}));
        decode(&entry, options.as_object())
    }

    #[test]
    fn absent_or_empty_options_are_empty() {
        let entry = entry_with(&fixture(), AuditLogAction::MemberPrune, json!({}));
        assert!(decode(&entry, None).unwrap().is_empty());
        assert!(extra(AuditLogAction::MemberPrune, json!({})).unwrap().is_empty());
    }

    #[test]
    fn member_prune_reads_string_counts() {
        let decoded = extra(
            AuditLogAction::MemberPrune,
            json!({ "delete_member_days": "7", "members_removed": "12" }),
        )
        .unwrap();
        assert_eq!(decoded.delete_member_days(), Some(7));
        assert_eq!(decoded.members_removed(), Some(12));
        assert!(decoded.channel().is_none());
    }

    #[test]
    fn message_delete_channel_is_optional() {
        let decoded = extra(AuditLogAction::MessageBulkDelete, json!({ "count": "40" })).unwrap();
        assert_eq!(decoded.count(), Some(40));
        assert!(decoded.channel().is_none());

        let decoded = extra(
            AuditLogAction::MessageDelete,
            json!({ "channel_id": "10", "count": "1" }),
        )
        .unwrap();
        assert!(decoded.channel().is_some_and(|c| c.is_cached()));
    }

    #[test]
    fn member_move_resolves_the_destination() {
        let decoded = extra(
            AuditLogAction::MemberMove,
            json!({ "channel_id": "12", "count": 3 }),
        )
        .unwrap();
        assert_eq!(decoded.count(), Some(3));
        assert!(decoded.channel().is_some_and(|c| c.is_cached() && c.id() == 12));

        let err = extra(AuditLogAction::MemberMove, json!({ "channel_id": "12" })).unwrap_err();
        assert!(matches!(err, AuditLogError::MissingOption { key: "count", .. }));
    }

    #[test]
    fn disconnect_and_prune_keep_a_channel_when_given() {
        let decoded = extra(
            AuditLogAction::MemberDisconnect,
            json!({ "channel_id": "12", "count": "2" }),
        )
        .unwrap();
        assert_eq!(decoded.count(), Some(2));
        assert_eq!(decoded.channel().map(Snowflake::id), Some(12));

        let decoded = extra(
            AuditLogAction::MemberPrune,
            json!({ "channel_id": "404", "delete_member_days": 1, "members_removed": 0 }),
        )
        .unwrap();
        assert!(decoded.channel().is_some_and(|c| !c.is_cached() && c.id() == 404));
    }

    #[test]
    fn stage_instance_requires_its_channel() {
        for action in [
            AuditLogAction::StageInstanceCreate,
            AuditLogAction::StageInstanceUpdate,
            AuditLogAction::StageInstanceDelete,
        ] {
            let decoded = extra(action, json!({ "channel_id": "12" })).unwrap();
            assert!(matches!(decoded, AuditLogExtra::StageInstance { .. }), "{action}");
            assert!(decoded.channel().is_some_and(|c| c.is_cached() && c.id() == 12));
        }

        let err = extra(AuditLogAction::StageInstanceUpdate, json!({ "channel_id": "stage" })).unwrap_err();
        assert!(matches!(err, AuditLogError::InvalidOption { key: "channel_id", .. }));
    }

    #[test]
    fn pin_carries_message_id() {
        let decoded = extra(
            AuditLogAction::MessagePin,
            json!({ "channel_id": "404", "message_id": "55" }),
        )
        .unwrap();
        assert_eq!(decoded.message_id(), Some(55));
        assert_eq!(decoded.channel().map(Snowflake::id), Some(404));
    }

    #[test]
    fn overwrite_role_miss_keeps_name() {
        let decoded = extra(
            AuditLogAction::OverwriteCreate,
            json!({ "id": "99", "type": "0", "role_name": "ghosts" }),
        )
        .unwrap();
        match decoded.overwrite_target() {
            Some(OverwriteTarget::Role(Resolved::Object(object))) => {
                assert_eq!(object.id, 99);
                assert_eq!(object.name.as_deref(), Some("ghosts"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn overwrite_member_miss_is_stand_in() {
        let decoded = extra(
            AuditLogAction::OverwriteUpdate,
            json!({ "id": "4242", "type": "1" }),
        )
        .unwrap();
        assert!(matches!(
            decoded.overwrite_target(),
            Some(OverwriteTarget::Object(o)) if o.id == 4242
        ));
    }

    #[test]
    fn auto_moderation_enforcement() {
        let decoded = extra(
            AuditLogAction::AutoModerationBlockMessage,
            json!({
                "channel_id": "10",
                "auto_moderation_rule_name": "no spam",
                "auto_moderation_rule_trigger_type": "3"
            }),
        )
        .unwrap();
        assert_eq!(decoded.rule_name(), Some("no spam"));
        assert_eq!(decoded.rule_trigger_type(), Some(AutoModerationTriggerType::Spam));
    }

    #[test]
    fn other_actions_fall_back_to_channel() {
        let decoded = extra(AuditLogAction::WebhookCreate, json!({ "channel_id": "10" })).unwrap();
        assert!(matches!(decoded, AuditLogExtra::Channel { .. }));
        let decoded = extra(AuditLogAction::WebhookCreate, json!({ "foo": 1 })).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn missing_required_option_fails() {
        let err = extra(AuditLogAction::MemberPrune, json!({ "delete_member_days": "7" })).unwrap_err();
        assert!(matches!(
            err,
            AuditLogError::MissingOption { key: "members_removed", .. }
        ));
    }

    #[test]
    fn malformed_option_fails() {
        let err = extra(AuditLogAction::MemberDisconnect, json!({ "count": "many" })).unwrap_err();
        assert!(matches!(err, AuditLogError::InvalidOption { key: "count", .. }));
    }
}
