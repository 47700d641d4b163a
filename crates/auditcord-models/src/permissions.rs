use bitflags::bitflags;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u64 {
        const CREATE_INSTANT_INVITE      = 1 << 0;
        const KICK_MEMBERS               = 1 << 1;
        const BAN_MEMBERS                = 1 << 2;
        const ADMINISTRATOR              = 1 << 3;
        const MANAGE_CHANNELS            = 1 << 4;
        const MANAGE_GUILD               = 1 << 5;
        const ADD_REACTIONS              = 1 << 6;
        const VIEW_AUDIT_LOG             = 1 << 7;
        const PRIORITY_SPEAKER           = 1 << 8;
        const STREAM                     = 1 << 9;
        const VIEW_CHANNEL               = 1 << 10;
        const SEND_MESSAGES              = 1 << 11;
        const SEND_TTS_MESSAGES          = 1 << 12;
        const MANAGE_MESSAGES            = 1 << 13;
        const EMBED_LINKS                = 1 << 14;
        const ATTACH_FILES               = 1 << 15;
        const READ_MESSAGE_HISTORY       = 1 << 16;
        const MENTION_EVERYONE           = 1 << 17;
        const USE_EXTERNAL_EMOJIS        = 1 << 18;
        const VIEW_GUILD_INSIGHTS        = 1 << 19;
        const CONNECT                    = 1 << 20;
        const SPEAK                      = 1 << 21;
        const MUTE_MEMBERS               = 1 << 22;
        const DEAFEN_MEMBERS             = 1 << 23;
        const MOVE_MEMBERS               = 1 << 24;
        const USE_VAD                    = 1 << 25;
        const CHANGE_NICKNAME            = 1 << 26;
        const MANAGE_NICKNAMES           = 1 << 27;
        const MANAGE_ROLES               = 1 << 28;
        const MANAGE_WEBHOOKS            = 1 << 29;
        const MANAGE_EMOJIS_AND_STICKERS = 1 << 30;
        const USE_APPLICATION_COMMANDS   = 1 << 31;
        const REQUEST_TO_SPEAK           = 1 << 32;
        const MANAGE_EVENTS              = 1 << 33;
        const MANAGE_THREADS             = 1 << 34;
        const CREATE_PUBLIC_THREADS      = 1 << 35;
        const CREATE_PRIVATE_THREADS     = 1 << 36;
        const USE_EXTERNAL_STICKERS      = 1 << 37;
        const SEND_MESSAGES_IN_THREADS   = 1 << 38;
        const USE_EMBEDDED_ACTIVITIES    = 1 << 39;
        const MODERATE_MEMBERS           = 1 << 40;
    }
}

impl Permissions {
    /// Parse the decimal string form used on the wire. Unknown bits are kept.
    pub fn from_wire(raw: &str) -> Option<Self> {
        raw.trim().parse::<u64>().ok().map(Self::from_bits_retain)
    }
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.bits())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BitsVisitor;

        impl<'de> Visitor<'de> for BitsVisitor {
            type Value = Permissions;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a permission bitset as a string or integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Permissions, E> {
                Ok(Permissions::from_bits_retain(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Permissions, E> {
                u64::try_from(v)
                    .map(Permissions::from_bits_retain)
                    .map_err(|_| E::custom(format!("negative permission bits: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Permissions, E> {
                Permissions::from_wire(v)
                    .ok_or_else(|| E::custom(format!("invalid permission bits: {v}")))
            }
        }

        deserializer.deserialize_any(BitsVisitor)
    }
}

/// Whom a channel permission overwrite applies to. Tagged `0`/`1` on the wire,
/// as an integer or a numeric string depending on the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverwriteType {
    Role,
    Member,
    Unknown,
}

impl OverwriteType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "0" | "role" => Self::Role,
            "1" | "member" => Self::Member,
            _ => Self::Unknown,
        }
    }

    pub fn from_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(tag) => Self::from_tag(tag),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(0) => Self::Role,
                Some(1) => Self::Member,
                _ => Self::Unknown,
            },
            _ => Self::Unknown,
        }
    }
}

impl Serialize for OverwriteType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Role => serializer.serialize_u8(0),
            Self::Member => serializer.serialize_u8(1),
            Self::Unknown => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for OverwriteType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_value(&raw))
    }
}

/// A raw channel overwrite as sent in channel payloads and audit-log changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelOverwrite {
    #[serde(with = "auditcord_util::snowflake::string")]
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: OverwriteType,
    #[serde(default = "Permissions::empty")]
    pub allow: Permissions,
    #[serde(default = "Permissions::empty")]
    pub deny: Permissions,
}

/// The allow/deny pair of an overwrite, detached from its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    pub allow: Permissions,
    pub deny: Permissions,
}

impl PermissionOverwrite {
    pub fn from_pair(allow: Permissions, deny: Permissions) -> Self {
        Self { allow, deny }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_strings_keep_unknown_bits() {
        let perms = Permissions::from_wire("9007199254740992").unwrap();
        assert_eq!(perms.bits(), 1 << 53);
        assert!(Permissions::from_wire("nope").is_none());
    }

    #[test]
    fn deserializes_strings_and_integers() {
        let from_str: Permissions = serde_json::from_value(json!("8")).unwrap();
        let from_int: Permissions = serde_json::from_value(json!(8)).unwrap();
        assert_eq!(from_str, Permissions::ADMINISTRATOR);
        assert_eq!(from_int, Permissions::ADMINISTRATOR);
        assert_eq!(serde_json::to_value(from_int).unwrap(), json!("8"));
    }

    #[test]
    fn overwrite_type_accepts_both_tag_forms() {
        assert_eq!(OverwriteType::from_value(&json!("0")), OverwriteType::Role);
        assert_eq!(OverwriteType::from_value(&json!(1)), OverwriteType::Member);
        assert_eq!(OverwriteType::from_value(&json!("2")), OverwriteType::Unknown);
    }
}
