use serde::{Deserialize, Serialize};

use crate::object::Snowflake;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emoji {
    #[serde(with = "auditcord_util::snowflake::string")]
    pub id: i64,
    #[serde(default, with = "auditcord_util::snowflake::option")]
    pub guild_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub animated: bool,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub managed: bool,
}

fn default_true() -> bool {
    true
}

impl Snowflake for Emoji {
    fn id(&self) -> i64 {
        self.id
    }
}
