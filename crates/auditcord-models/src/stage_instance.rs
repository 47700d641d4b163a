use serde::{Deserialize, Serialize};

use crate::enums::StagePrivacyLevel;
use crate::object::Snowflake;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageInstance {
    #[serde(with = "auditcord_util::snowflake::string")]
    pub id: i64,
    #[serde(with = "auditcord_util::snowflake::string")]
    pub guild_id: i64,
    #[serde(with = "auditcord_util::snowflake::string")]
    pub channel_id: i64,
    pub topic: String,
    pub privacy_level: StagePrivacyLevel,
}

impl Snowflake for StageInstance {
    fn id(&self) -> i64 {
        self.id
    }
}
