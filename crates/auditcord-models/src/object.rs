use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::role::Role;

/// Anything addressable by a snowflake.
pub trait Snowflake {
    fn id(&self) -> i64;

    fn created_at(&self) -> DateTime<Utc> {
        auditcord_util::snowflake::created_at(self.id())
    }
}

/// Stand-in for an entity that is not in any cache. Carries only the id,
/// plus a display name when the payload happened to include one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    #[serde(with = "auditcord_util::snowflake::string")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Object {
    pub fn new(id: i64) -> Self {
        Self { id, name: None }
    }
}

impl Snowflake for Object {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Result of a cache lookup that falls back to an [`Object`] stand-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resolved<T> {
    Cached(T),
    Object(Object),
}

impl<T> Resolved<T> {
    pub fn or_object(found: Option<T>, id: i64) -> Self {
        match found {
            Some(value) => Self::Cached(value),
            None => Self::Object(Object::new(id)),
        }
    }

    pub fn cached(&self) -> Option<&T> {
        match self {
            Self::Cached(value) => Some(value),
            Self::Object(_) => None,
        }
    }

    pub fn object(&self) -> Option<&Object> {
        match self {
            Self::Cached(_) => None,
            Self::Object(object) => Some(object),
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }
}

impl<T: Snowflake> Snowflake for Resolved<T> {
    fn id(&self) -> i64 {
        match self {
            Self::Cached(value) => value.id(),
            Self::Object(object) => object.id,
        }
    }
}

pub type ChannelRef = Resolved<Channel>;
pub type RoleRef = Resolved<Role>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_object_falls_back_to_id() {
        let missing: Resolved<Object> = Resolved::or_object(None, 9);
        assert!(!missing.is_cached());
        assert_eq!(missing.id(), 9);
        assert_eq!(missing.object().and_then(|o| o.name.clone()), None);
    }

    #[test]
    fn stand_in_has_a_creation_time() {
        assert_eq!(Object::new(3).created_at().timestamp_millis(), 1_420_070_400_000);
    }
}
