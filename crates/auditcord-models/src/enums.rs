//! Integer-backed wire enums.
//!
//! Every enum decodes any integer: values this crate does not know about
//! land in an `Unknown(i64)` variant instead of failing, so payloads from a
//! newer API version still decode.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Common surface of the tolerant integer enums.
pub trait TolerantEnum: Copy + fmt::Debug {
    /// Wire name of the enum, used in log output.
    const NAME: &'static str;

    fn from_value(value: i64) -> Self;
    fn value(self) -> i64;
    fn is_unknown(self) -> bool;
}

macro_rules! tolerant_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident = $value:literal => $label:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)*
            Unknown(i64),
        }

        impl $name {
            /// Snake-case wire label; `"unknown"` for unrecognized values.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)*
                    Self::Unknown(_) => "unknown",
                }
            }
        }

        impl $crate::enums::TolerantEnum for $name {
            const NAME: &'static str = stringify!($name);

            fn from_value(value: i64) -> Self {
                match value {
                    $($value => Self::$variant,)*
                    other => Self::Unknown(other),
                }
            }

            fn value(self) -> i64 {
                match self {
                    $(Self::$variant => $value,)*
                    Self::Unknown(value) => value,
                }
            }

            fn is_unknown(self) -> bool {
                matches!(self, Self::Unknown(_))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                <Self as $crate::enums::TolerantEnum>::from_value(value)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i64($crate::enums::TolerantEnum::value(*self))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <i64 as ::serde::Deserialize>::deserialize(deserializer)?;
                Ok(<Self as $crate::enums::TolerantEnum>::from_value(value))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    Self::Unknown(value) => write!(f, "unknown({value})"),
                    known => f.write_str(known.name()),
                }
            }
        }
    };
}

pub(crate) use tolerant_enum;

tolerant_enum! {
    pub enum ChannelType {
        Text = 0 => "text",
        Private = 1 => "private",
        Voice = 2 => "voice",
        Group = 3 => "group",
        Category = 4 => "category",
        News = 5 => "news",
        NewsThread = 10 => "news_thread",
        PublicThread = 11 => "public_thread",
        PrivateThread = 12 => "private_thread",
        StageVoice = 13 => "stage_voice",
        GuildDirectory = 14 => "guild_directory",
        Forum = 15 => "forum",
    }
}

impl ChannelType {
    pub fn is_thread(self) -> bool {
        matches!(self, Self::NewsThread | Self::PublicThread | Self::PrivateThread)
    }
}

tolerant_enum! {
    pub enum VerificationLevel {
        None = 0 => "none",
        Low = 1 => "low",
        Medium = 2 => "medium",
        High = 3 => "high",
        Highest = 4 => "highest",
    }
}

tolerant_enum! {
    pub enum ContentFilter {
        Disabled = 0 => "disabled",
        NoRole = 1 => "no_role",
        AllMembers = 2 => "all_members",
    }
}

tolerant_enum! {
    pub enum NotificationLevel {
        AllMessages = 0 => "all_messages",
        OnlyMentions = 1 => "only_mentions",
    }
}

tolerant_enum! {
    pub enum VideoQualityMode {
        Auto = 1 => "auto",
        Full = 2 => "full",
    }
}

tolerant_enum! {
    pub enum StagePrivacyLevel {
        Public = 1 => "public",
        GuildOnly = 2 => "guild_only",
    }
}

tolerant_enum! {
    pub enum StickerType {
        Standard = 1 => "standard",
        Guild = 2 => "guild",
    }
}

tolerant_enum! {
    pub enum StickerFormatType {
        Png = 1 => "png",
        Apng = 2 => "apng",
        Lottie = 3 => "lottie",
        Gif = 4 => "gif",
    }
}

tolerant_enum! {
    pub enum ScheduledEventEntityType {
        StageInstance = 1 => "stage_instance",
        Voice = 2 => "voice",
        External = 3 => "external",
    }
}

tolerant_enum! {
    pub enum AutoModerationTriggerType {
        Keyword = 1 => "keyword",
        HarmfulLink = 2 => "harmful_link",
        Spam = 3 => "spam",
        KeywordPreset = 4 => "keyword_preset",
        MentionSpam = 5 => "mention_spam",
    }
}

tolerant_enum! {
    pub enum AutoModerationEventType {
        MessageSend = 1 => "message_send",
    }
}

tolerant_enum! {
    pub enum AutoModerationActionType {
        BlockMessage = 1 => "block_message",
        SendAlertMessage = 2 => "send_alert_message",
        Timeout = 3 => "timeout",
    }
}

tolerant_enum! {
    pub enum KeywordPresetType {
        Profanity = 1 => "profanity",
        SexualContent = 2 => "sexual_content",
        Slurs = 3 => "slurs",
    }
}

/// Voice regions are the one string-valued enum on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VoiceRegion {
    UsWest,
    UsEast,
    UsSouth,
    UsCentral,
    EuWest,
    EuCentral,
    Singapore,
    London,
    Sydney,
    Amsterdam,
    Frankfurt,
    Brazil,
    HongKong,
    Russia,
    Japan,
    SouthAfrica,
    SouthKorea,
    India,
    Europe,
    Dubai,
    VipUsEast,
    VipUsWest,
    VipAmsterdam,
    Unknown(String),
}

const VOICE_REGIONS: &[(&str, VoiceRegion)] = &[
    ("us-west", VoiceRegion::UsWest),
    ("us-east", VoiceRegion::UsEast),
    ("us-south", VoiceRegion::UsSouth),
    ("us-central", VoiceRegion::UsCentral),
    ("eu-west", VoiceRegion::EuWest),
    ("eu-central", VoiceRegion::EuCentral),
    ("singapore", VoiceRegion::Singapore),
    ("london", VoiceRegion::London),
    ("sydney", VoiceRegion::Sydney),
    ("amsterdam", VoiceRegion::Amsterdam),
    ("frankfurt", VoiceRegion::Frankfurt),
    ("brazil", VoiceRegion::Brazil),
    ("hongkong", VoiceRegion::HongKong),
    ("russia", VoiceRegion::Russia),
    ("japan", VoiceRegion::Japan),
    ("southafrica", VoiceRegion::SouthAfrica),
    ("south-korea", VoiceRegion::SouthKorea),
    ("india", VoiceRegion::India),
    ("europe", VoiceRegion::Europe),
    ("dubai", VoiceRegion::Dubai),
    ("vip-us-east", VoiceRegion::VipUsEast),
    ("vip-us-west", VoiceRegion::VipUsWest),
    ("vip-amsterdam", VoiceRegion::VipAmsterdam),
];

impl VoiceRegion {
    pub fn from_value(value: &str) -> Self {
        VOICE_REGIONS
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, region)| region.clone())
            .unwrap_or_else(|| Self::Unknown(value.to_string()))
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Unknown(raw) => raw,
            known => VOICE_REGIONS
                .iter()
                .find(|(_, region)| region == known)
                .map(|(name, _)| *name)
                .unwrap_or_default(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for VoiceRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl Serialize for VoiceRegion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.value())
    }
}

impl<'de> Deserialize<'de> for VoiceRegion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_value(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_values_decode() {
        assert_eq!(VerificationLevel::from_value(3), VerificationLevel::High);
        assert_eq!(ChannelType::from_value(15), ChannelType::Forum);
        assert!(ChannelType::PublicThread.is_thread());
        assert!(!ChannelType::Text.is_thread());
    }

    #[test]
    fn unknown_values_are_kept() {
        let level = VerificationLevel::from_value(999);
        assert_eq!(level, VerificationLevel::Unknown(999));
        assert!(level.is_unknown());
        assert_eq!(level.value(), 999);
        assert_eq!(level.to_string(), "unknown(999)");
    }

    #[test]
    fn serde_uses_integers() {
        let filter: ContentFilter = serde_json::from_value(json!(2)).unwrap();
        assert_eq!(filter, ContentFilter::AllMembers);
        assert_eq!(serde_json::to_value(filter).unwrap(), json!(2));
        let odd: ContentFilter = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(serde_json::to_value(odd).unwrap(), json!(42));
    }

    #[test]
    fn voice_region_round_trips_unknown_strings() {
        assert_eq!(VoiceRegion::from_value("us-west"), VoiceRegion::UsWest);
        assert_eq!(VoiceRegion::UsWest.value(), "us-west");
        let region = VoiceRegion::from_value("mars-north");
        assert!(region.is_unknown());
        assert_eq!(region.to_string(), "mars-north");
    }
}
