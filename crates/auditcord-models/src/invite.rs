use serde::{Deserialize, Serialize};

use crate::member::MemberOrUser;
use crate::object::ChannelRef;

/// An invite as far as it can be known from audit-log changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invite {
    pub code: String,
    #[serde(default, with = "auditcord_util::snowflake::option")]
    pub guild_id: Option<i64>,
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    #[serde(default)]
    pub inviter: Option<MemberOrUser>,
    #[serde(default)]
    pub uses: Option<i64>,
    #[serde(default)]
    pub max_uses: Option<i64>,
    #[serde(default)]
    pub max_age: Option<i64>,
    #[serde(default)]
    pub temporary: Option<bool>,
}

impl Invite {
    pub fn url(&self) -> String {
        format!("https://discord.gg/{}", self.code)
    }
}
