use serde::{Deserialize, Serialize};

use crate::colour::Colour;
use crate::object::Snowflake;
use crate::permissions::Permissions;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    #[serde(with = "auditcord_util::snowflake::string")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Colour,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "Permissions::empty")]
    pub permissions: Permissions,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
}

impl Snowflake for Role {
    fn id(&self) -> i64 {
        self.id
    }
}
