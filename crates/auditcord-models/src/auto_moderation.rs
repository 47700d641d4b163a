use serde::{Deserialize, Serialize};

use crate::enums::{
    AutoModerationActionType, AutoModerationEventType, AutoModerationTriggerType,
    KeywordPresetType,
};
use crate::object::Snowflake;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoModerationTriggerMetadata {
    #[serde(default)]
    pub keyword_filter: Vec<String>,
    #[serde(default)]
    pub regex_patterns: Vec<String>,
    #[serde(default)]
    pub presets: Vec<KeywordPresetType>,
    #[serde(default)]
    pub allow_list: Vec<String>,
    #[serde(default)]
    pub mention_total_limit: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoModerationActionMetadata {
    #[serde(default, with = "auditcord_util::snowflake::option")]
    pub channel_id: Option<i64>,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub custom_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoModerationAction {
    #[serde(rename = "type")]
    pub action_type: AutoModerationActionType,
    #[serde(default)]
    pub metadata: AutoModerationActionMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoModerationRule {
    #[serde(with = "auditcord_util::snowflake::string")]
    pub id: i64,
    #[serde(with = "auditcord_util::snowflake::string")]
    pub guild_id: i64,
    pub name: String,
    #[serde(with = "auditcord_util::snowflake::string")]
    pub creator_id: i64,
    pub event_type: AutoModerationEventType,
    pub trigger_type: AutoModerationTriggerType,
    #[serde(default)]
    pub trigger_metadata: AutoModerationTriggerMetadata,
    #[serde(default)]
    pub actions: Vec<AutoModerationAction>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, with = "auditcord_util::snowflake::vec")]
    pub exempt_roles: Vec<i64>,
    #[serde(default, with = "auditcord_util::snowflake::vec")]
    pub exempt_channels: Vec<i64>,
}

impl Snowflake for AutoModerationRule {
    fn id(&self) -> i64 {
        self.id
    }
}
