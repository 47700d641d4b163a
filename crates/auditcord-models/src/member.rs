use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::object::Snowflake;
use crate::user::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub user: User,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default, with = "auditcord_util::snowflake::vec")]
    pub roles: Vec<i64>,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deaf: bool,
    #[serde(default)]
    pub mute: bool,
}

impl Member {
    pub fn display_name(&self) -> &str {
        self.nick.as_deref().unwrap_or_else(|| self.user.display_name())
    }
}

impl Snowflake for Member {
    fn id(&self) -> i64 {
        self.user.id
    }
}

/// An actor or target that is a guild member when cached, else a bare user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberOrUser {
    Member(Member),
    User(User),
}

impl MemberOrUser {
    pub fn user(&self) -> &User {
        match self {
            Self::Member(member) => &member.user,
            Self::User(user) => user,
        }
    }

    pub fn member(&self) -> Option<&Member> {
        match self {
            Self::Member(member) => Some(member),
            Self::User(_) => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Member(member) => member.display_name(),
            Self::User(user) => user.display_name(),
        }
    }
}

impl Snowflake for MemberOrUser {
    fn id(&self) -> i64 {
        self.user().id
    }
}
