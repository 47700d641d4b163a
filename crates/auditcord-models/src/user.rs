use serde::{Deserialize, Serialize};

use crate::object::Snowflake;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(with = "auditcord_util::snowflake::string")]
    pub id: i64,
    pub username: String,
    #[serde(default = "default_discriminator")]
    pub discriminator: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
    #[serde(default)]
    pub system: bool,
}

fn default_discriminator() -> String {
    "0".into()
}

impl User {
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

impl Snowflake for User {
    fn id(&self) -> i64 {
        self.id
    }
}
