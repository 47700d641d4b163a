use serde::{Deserialize, Serialize};

use crate::enums::{ChannelType, VideoQualityMode};
use crate::object::Snowflake;
use crate::permissions::ChannelOverwrite;

/// A guild channel. Threads share this shape and are told apart by `channel_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    #[serde(with = "auditcord_util::snowflake::string")]
    pub id: i64,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    #[serde(default, with = "auditcord_util::snowflake::option")]
    pub guild_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default)]
    pub bitrate: Option<i32>,
    #[serde(default)]
    pub user_limit: Option<i32>,
    #[serde(default)]
    pub rate_limit_per_user: Option<i32>,
    #[serde(default, with = "auditcord_util::snowflake::option")]
    pub parent_id: Option<i64>,
    /// Creator of the thread; unset for regular channels.
    #[serde(default, with = "auditcord_util::snowflake::option")]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub rtc_region: Option<String>,
    #[serde(default)]
    pub video_quality_mode: Option<VideoQualityMode>,
    #[serde(default)]
    pub permission_overwrites: Vec<ChannelOverwrite>,
}

impl Channel {
    pub fn is_thread(&self) -> bool {
        self.channel_type.is_thread()
    }
}

impl Snowflake for Channel {
    fn id(&self) -> i64 {
        self.id
    }
}
