use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::auto_moderation::AutoModerationRule;
use crate::enums::tolerant_enum;
use crate::user::User;

tolerant_enum! {
    pub enum AuditLogAction {
        GuildUpdate = 1 => "guild_update",
        ChannelCreate = 10 => "channel_create",
        ChannelUpdate = 11 => "channel_update",
        ChannelDelete = 12 => "channel_delete",
        OverwriteCreate = 13 => "overwrite_create",
        OverwriteUpdate = 14 => "overwrite_update",
        OverwriteDelete = 15 => "overwrite_delete",
        Kick = 20 => "kick",
        MemberPrune = 21 => "member_prune",
        Ban = 22 => "ban",
        Unban = 23 => "unban",
        MemberUpdate = 24 => "member_update",
        MemberRoleUpdate = 25 => "member_role_update",
        MemberMove = 26 => "member_move",
        MemberDisconnect = 27 => "member_disconnect",
        BotAdd = 28 => "bot_add",
        RoleCreate = 30 => "role_create",
        RoleUpdate = 31 => "role_update",
        RoleDelete = 32 => "role_delete",
        InviteCreate = 40 => "invite_create",
        InviteUpdate = 41 => "invite_update",
        InviteDelete = 42 => "invite_delete",
        WebhookCreate = 50 => "webhook_create",
        WebhookUpdate = 51 => "webhook_update",
        WebhookDelete = 52 => "webhook_delete",
        EmojiCreate = 60 => "emoji_create",
        EmojiUpdate = 61 => "emoji_update",
        EmojiDelete = 62 => "emoji_delete",
        MessageDelete = 72 => "message_delete",
        MessageBulkDelete = 73 => "message_bulk_delete",
        MessagePin = 74 => "message_pin",
        MessageUnpin = 75 => "message_unpin",
        IntegrationCreate = 80 => "integration_create",
        IntegrationUpdate = 81 => "integration_update",
        IntegrationDelete = 82 => "integration_delete",
        StageInstanceCreate = 83 => "stage_instance_create",
        StageInstanceUpdate = 84 => "stage_instance_update",
        StageInstanceDelete = 85 => "stage_instance_delete",
        StickerCreate = 90 => "sticker_create",
        StickerUpdate = 91 => "sticker_update",
        StickerDelete = 92 => "sticker_delete",
        ScheduledEventCreate = 100 => "scheduled_event_create",
        ScheduledEventUpdate = 101 => "scheduled_event_update",
        ScheduledEventDelete = 102 => "scheduled_event_delete",
        ThreadCreate = 110 => "thread_create",
        ThreadUpdate = 111 => "thread_update",
        ThreadDelete = 112 => "thread_delete",
        ApplicationCommandPermissionUpdate = 121 => "application_command_permission_update",
        AutoModerationRuleCreate = 140 => "auto_moderation_rule_create",
        AutoModerationRuleUpdate = 141 => "auto_moderation_rule_update",
        AutoModerationRuleDelete = 142 => "auto_moderation_rule_delete",
        AutoModerationBlockMessage = 143 => "auto_moderation_block_message",
        AutoModerationFlagToChannel = 144 => "auto_moderation_flag_to_channel",
        AutoModerationUserCommunicationDisabled = 145 => "auto_moderation_user_communication_disabled",
    }
}

/// Broad kind of change an action represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditLogActionCategory {
    Create,
    Update,
    Delete,
}

/// What an entry's `target_id` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Guild,
    Channel,
    User,
    Role,
    Invite,
    Webhook,
    Emoji,
    Message,
    Integration,
    StageInstance,
    Sticker,
    ScheduledEvent,
    Thread,
    ApplicationCommand,
    AutoModerationRule,
}

impl AuditLogAction {
    pub fn category(self) -> Option<AuditLogActionCategory> {
        use AuditLogAction::*;
        use AuditLogActionCategory::{Create, Delete, Update};

        match self {
            ChannelCreate | OverwriteCreate | RoleCreate | InviteCreate | WebhookCreate
            | EmojiCreate | IntegrationCreate | StageInstanceCreate | StickerCreate
            | ScheduledEventCreate | ThreadCreate | AutoModerationRuleCreate => Some(Create),

            GuildUpdate | ChannelUpdate | OverwriteUpdate | MemberUpdate | MemberRoleUpdate
            | RoleUpdate | InviteUpdate | WebhookUpdate | EmojiUpdate | IntegrationUpdate
            | StageInstanceUpdate | StickerUpdate | ScheduledEventUpdate | ThreadUpdate
            | ApplicationCommandPermissionUpdate | AutoModerationRuleUpdate => Some(Update),

            ChannelDelete | OverwriteDelete | RoleDelete | InviteDelete | WebhookDelete
            | EmojiDelete | MessageDelete | MessageBulkDelete | IntegrationDelete
            | StageInstanceDelete | StickerDelete | ScheduledEventDelete | ThreadDelete
            | AutoModerationRuleDelete => Some(Delete),

            Kick | MemberPrune | Ban | Unban | MemberMove | MemberDisconnect | BotAdd
            | MessagePin | MessageUnpin | AutoModerationBlockMessage
            | AutoModerationFlagToChannel | AutoModerationUserCommunicationDisabled
            | Unknown(_) => None,
        }
    }

    pub fn target_type(self) -> Option<TargetType> {
        let value = match self {
            Self::Unknown(_) => return None,
            // bulk deletes target the channel, not a message author
            Self::MessageBulkDelete => return Some(TargetType::Channel),
            known => crate::enums::TolerantEnum::value(known),
        };

        let target = match value {
            i64::MIN..=9 => TargetType::Guild,
            10..=19 => TargetType::Channel,
            20..=29 => TargetType::User,
            30..=39 => TargetType::Role,
            40..=49 => TargetType::Invite,
            50..=59 => TargetType::Webhook,
            60..=69 => TargetType::Emoji,
            70..=79 => TargetType::Message,
            80..=82 => TargetType::Integration,
            83..=89 => TargetType::StageInstance,
            90..=92 => TargetType::Sticker,
            100..=102 => TargetType::ScheduledEvent,
            110..=112 => TargetType::Thread,
            121 => TargetType::ApplicationCommand,
            140..=142 => TargetType::AutoModerationRule,
            143..=145 => TargetType::User,
            _ => return None,
        };
        Some(target)
    }

    pub fn is_pin(self) -> bool {
        matches!(self, Self::MessagePin | Self::MessageUnpin)
    }

    pub fn is_overwrite(self) -> bool {
        matches!(
            self,
            Self::OverwriteCreate | Self::OverwriteUpdate | Self::OverwriteDelete
        )
    }

    pub fn is_stage_instance(self) -> bool {
        matches!(
            self,
            Self::StageInstanceCreate | Self::StageInstanceUpdate | Self::StageInstanceDelete
        )
    }

    pub fn is_sticker(self) -> bool {
        matches!(
            self,
            Self::StickerCreate | Self::StickerUpdate | Self::StickerDelete
        )
    }

    /// Automod enforcement actions, which carry the triggering rule in their options.
    pub fn is_auto_moderation_enforcement(self) -> bool {
        matches!(
            self,
            Self::AutoModerationBlockMessage
                | Self::AutoModerationFlagToChannel
                | Self::AutoModerationUserCommunicationDisabled
        )
    }
}

/// One `{key, old_value, new_value}` record. A side missing from the payload
/// is `None`; a side sent as `null` is `Some(Value::Null)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub key: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl ChangeRecord {
    pub fn new(key: impl Into<String>, old_value: Option<Value>, new_value: Option<Value>) -> Self {
        Self {
            key: key.into(),
            old_value,
            new_value,
        }
    }
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntryPayload {
    #[serde(with = "auditcord_util::snowflake::string")]
    pub id: i64,
    pub action_type: AuditLogAction,
    #[serde(default, with = "auditcord_util::snowflake::option")]
    pub user_id: Option<i64>,
    #[serde(default, with = "auditcord_util::snowflake::option")]
    pub target_id: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub options: Option<Map<String, Value>>,
    #[serde(default)]
    pub changes: Vec<ChangeRecord>,
}

/// Response body of the guild audit-log endpoint. Only the parts the
/// decoder reads are modelled; webhooks, integrations and threads are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLogPayload {
    #[serde(default)]
    pub audit_log_entries: Vec<AuditLogEntryPayload>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub auto_moderation_rules: Vec<AutoModerationRule>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::TolerantEnum;
    use serde_json::json;

    #[test]
    fn target_types_follow_action_ranges() {
        assert_eq!(AuditLogAction::GuildUpdate.target_type(), Some(TargetType::Guild));
        assert_eq!(AuditLogAction::OverwriteUpdate.target_type(), Some(TargetType::Channel));
        assert_eq!(AuditLogAction::MemberPrune.target_type(), Some(TargetType::User));
        assert_eq!(AuditLogAction::MessageDelete.target_type(), Some(TargetType::Message));
        assert_eq!(AuditLogAction::MessageBulkDelete.target_type(), Some(TargetType::Channel));
        assert_eq!(AuditLogAction::StageInstanceDelete.target_type(), Some(TargetType::StageInstance));
        assert_eq!(
            AuditLogAction::AutoModerationRuleUpdate.target_type(),
            Some(TargetType::AutoModerationRule)
        );
        assert_eq!(AuditLogAction::AutoModerationBlockMessage.target_type(), Some(TargetType::User));
        assert_eq!(AuditLogAction::Unknown(999).target_type(), None);
    }

    #[test]
    fn categories() {
        assert_eq!(AuditLogAction::ChannelCreate.category(), Some(AuditLogActionCategory::Create));
        assert_eq!(AuditLogAction::MemberRoleUpdate.category(), Some(AuditLogActionCategory::Update));
        assert_eq!(AuditLogAction::MessageBulkDelete.category(), Some(AuditLogActionCategory::Delete));
        assert_eq!(AuditLogAction::Kick.category(), None);
        assert_eq!(AuditLogAction::Unknown(7).category(), None);
    }

    #[test]
    fn family_predicates() {
        assert!(AuditLogAction::MessageUnpin.is_pin());
        assert!(AuditLogAction::OverwriteDelete.is_overwrite());
        assert!(AuditLogAction::StickerUpdate.is_sticker());
        assert!(!AuditLogAction::StageInstanceCreate.is_sticker());
        assert_eq!(AuditLogAction::from_value(74).name(), "message_pin");
    }

    #[test]
    fn change_record_distinguishes_null_from_absent() {
        let record: ChangeRecord =
            serde_json::from_value(json!({ "key": "topic", "old_value": null })).unwrap();
        assert_eq!(record.old_value, Some(Value::Null));
        assert_eq!(record.new_value, None);
    }

    #[test]
    fn entry_payload_reads_string_ids() {
        let entry: AuditLogEntryPayload = serde_json::from_value(json!({
            "id": "1100",
            "action_type": 21,
            "user_id": "5",
            "target_id": null,
            "options": { "delete_member_days": "7", "members_removed": "3" }
        }))
        .unwrap();
        assert_eq!(entry.id, 1100);
        assert_eq!(entry.action_type, AuditLogAction::MemberPrune);
        assert_eq!(entry.user_id, Some(5));
        assert_eq!(entry.target_id, None);
        assert!(entry.changes.is_empty());
    }
}
