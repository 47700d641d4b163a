use serde::{Deserialize, Serialize};

use crate::enums::{ContentFilter, NotificationLevel, VerificationLevel};
use crate::object::Snowflake;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guild {
    #[serde(with = "auditcord_util::snowflake::string")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub splash: Option<String>,
    #[serde(default)]
    pub discovery_splash: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "auditcord_util::snowflake::string")]
    pub owner_id: i64,
    #[serde(default, with = "auditcord_util::snowflake::option")]
    pub afk_channel_id: Option<i64>,
    #[serde(default, with = "auditcord_util::snowflake::option")]
    pub system_channel_id: Option<i64>,
    #[serde(default, with = "auditcord_util::snowflake::option")]
    pub rules_channel_id: Option<i64>,
    #[serde(default, with = "auditcord_util::snowflake::option")]
    pub public_updates_channel_id: Option<i64>,
    #[serde(default = "default_verification_level")]
    pub verification_level: VerificationLevel,
    #[serde(default = "default_content_filter")]
    pub explicit_content_filter: ContentFilter,
    #[serde(default = "default_notifications")]
    pub default_message_notifications: NotificationLevel,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub vanity_url_code: Option<String>,
}

fn default_verification_level() -> VerificationLevel {
    VerificationLevel::None
}

fn default_content_filter() -> ContentFilter {
    ContentFilter::Disabled
}

fn default_notifications() -> NotificationLevel {
    NotificationLevel::AllMessages
}

impl Snowflake for Guild {
    fn id(&self) -> i64 {
        self.id
    }
}
