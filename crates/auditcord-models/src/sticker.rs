use serde::{Deserialize, Serialize};

use crate::enums::{StickerFormatType, StickerType};
use crate::object::Snowflake;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildSticker {
    #[serde(with = "auditcord_util::snowflake::string")]
    pub id: i64,
    #[serde(default, with = "auditcord_util::snowflake::option")]
    pub guild_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Autocomplete emoji name for the sticker.
    #[serde(default)]
    pub tags: String,
    #[serde(rename = "type")]
    pub sticker_type: StickerType,
    pub format_type: StickerFormatType,
    #[serde(default)]
    pub available: bool,
}

impl Snowflake for GuildSticker {
    fn id(&self) -> i64 {
        self.id
    }
}
