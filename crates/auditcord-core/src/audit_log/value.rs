use serde::Serialize;
use serde_json::Value;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use auditcord_models::asset::Asset;
use auditcord_models::auto_moderation::{AutoModerationAction, AutoModerationTriggerMetadata};
use auditcord_models::colour::Colour;
use auditcord_models::enums::{
    AutoModerationEventType, AutoModerationTriggerType, ChannelType, ContentFilter,
    NotificationLevel, ScheduledEventEntityType, StagePrivacyLevel, StickerFormatType,
    StickerType, VerificationLevel, VideoQualityMode, VoiceRegion,
};
use auditcord_models::guild::Guild;
use auditcord_models::member::MemberOrUser;
use auditcord_models::object::{ChannelRef, Object, RoleRef, Snowflake};
use auditcord_models::permissions::{PermissionOverwrite, Permissions};

/// Who a permission overwrite applies to, resolved as far as the caches allow.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OverwriteTarget {
    Role(RoleRef),
    Member(MemberOrUser),
    Object(Object),
}

impl Snowflake for OverwriteTarget {
    fn id(&self) -> i64 {
        match self {
            Self::Role(role) => role.id(),
            Self::Member(member) => member.id(),
            Self::Object(object) => object.id,
        }
    }
}

/// A decoded attribute value of a [`DiffView`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AuditValue {
    /// The record did not carry this side, or carried `null`.
    None,
    /// Untransformed wire value.
    Raw(Value),
    Int(i64),
    Permissions(Permissions),
    Colour(Colour),
    User(MemberOrUser),
    Channel(ChannelRef),
    Role(RoleRef),
    Guild(Box<Guild>),
    Overwrites(Vec<(OverwriteTarget, PermissionOverwrite)>),
    Asset(Asset),
    VerificationLevel(VerificationLevel),
    ContentFilter(ContentFilter),
    NotificationLevel(NotificationLevel),
    VoiceRegion(VoiceRegion),
    VideoQualityMode(VideoQualityMode),
    StagePrivacyLevel(StagePrivacyLevel),
    StickerFormatType(StickerFormatType),
    StickerType(StickerType),
    ChannelType(ChannelType),
    ScheduledEventEntityType(ScheduledEventEntityType),
    AutoModerationTriggerType(AutoModerationTriggerType),
    AutoModerationEventType(AutoModerationEventType),
    AutoModerationAction(AutoModerationAction),
    TriggerMetadata(AutoModerationTriggerMetadata),
    List(Vec<AuditValue>),
}

impl AuditValue {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Self::Raw(value) => Some(value),
            _ => None,
        }
    }

    /// Integer view of the value, reading through numeric raw values and numeric strings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Raw(Value::Number(n)) => n.as_i64(),
            Self::Raw(Value::String(s)) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_raw().and_then(Value::as_bool)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_raw().and_then(Value::as_str)
    }

    pub fn as_list(&self) -> Option<&[AuditValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_channel(&self) -> Option<&ChannelRef> {
        match self {
            Self::Channel(channel) => Some(channel),
            _ => None,
        }
    }

    pub fn as_role(&self) -> Option<&RoleRef> {
        match self {
            Self::Role(role) => Some(role),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<&MemberOrUser> {
        match self {
            Self::User(user) => Some(user),
            _ => None,
        }
    }
}

macro_rules! enum_values {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for AuditValue {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

enum_values!(
    VerificationLevel,
    ContentFilter,
    NotificationLevel,
    VideoQualityMode,
    StagePrivacyLevel,
    StickerFormatType,
    StickerType,
    ChannelType,
    ScheduledEventEntityType,
    AutoModerationTriggerType,
    AutoModerationEventType,
);

impl fmt::Display for AuditValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Raw(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Permissions(perms) => write!(f, "{}", perms.bits()),
            Self::Colour(colour) => write!(f, "{colour}"),
            Self::User(user) => write!(f, "{} ({})", user.display_name(), user.id()),
            Self::Channel(channel) => match channel.cached().and_then(|c| c.name.as_deref()) {
                Some(name) => write!(f, "#{name} ({})", channel.id()),
                None => write!(f, "<channel {}>", channel.id()),
            },
            Self::Role(role) => match role {
                RoleRef::Cached(role) => write!(f, "@{} ({})", role.name, role.id),
                RoleRef::Object(object) => match &object.name {
                    Some(name) => write!(f, "@{name} ({})", object.id),
                    None => write!(f, "<role {}>", object.id),
                },
            },
            Self::Guild(guild) => write!(f, "{} ({})", guild.name, guild.id),
            Self::Overwrites(overwrites) => {
                f.write_str("[")?;
                for (i, (target, ow)) in overwrites.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: +{} -{}", target.id(), ow.allow.bits(), ow.deny.bits())?;
                }
                f.write_str("]")
            }
            Self::Asset(asset) => write!(f, "{asset}"),
            Self::VerificationLevel(v) => write!(f, "{v}"),
            Self::ContentFilter(v) => write!(f, "{v}"),
            Self::NotificationLevel(v) => write!(f, "{v}"),
            Self::VoiceRegion(v) => write!(f, "{v}"),
            Self::VideoQualityMode(v) => write!(f, "{v}"),
            Self::StagePrivacyLevel(v) => write!(f, "{v}"),
            Self::StickerFormatType(v) => write!(f, "{v}"),
            Self::StickerType(v) => write!(f, "{v}"),
            Self::ChannelType(v) => write!(f, "{v}"),
            Self::ScheduledEventEntityType(v) => write!(f, "{v}"),
            Self::AutoModerationTriggerType(v) => write!(f, "{v}"),
            Self::AutoModerationEventType(v) => write!(f, "{v}"),
            Self::AutoModerationAction(action) => write!(f, "{}", action.action_type),
            Self::TriggerMetadata(metadata) => write!(f, "{metadata:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// One side (before or after) of an entry's changes: attribute name to decoded value.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DiffView {
    attrs: BTreeMap<String, AuditValue>,
}

impl DiffView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attr: &str) -> Option<&AuditValue> {
        self.attrs.get(attr)
    }

    pub fn contains(&self, attr: &str) -> bool {
        self.attrs.contains_key(attr)
    }

    pub fn insert(&mut self, attr: impl Into<String>, value: AuditValue) {
        self.attrs.insert(attr.into(), value);
    }

    /// Append to the list stored under `attr`, creating it first if needed.
    /// A non-list value already stored there is replaced.
    pub fn extend_list(&mut self, attr: &str, values: Vec<AuditValue>) {
        match self.attrs.get_mut(attr) {
            Some(AuditValue::List(items)) => items.extend(values),
            _ => {
                self.attrs.insert(attr.to_string(), AuditValue::List(values));
            }
        }
    }

    /// Store one value under both spellings. `canonical` wins when both are
    /// present; `alias` only fills in when `canonical` is absent.
    pub(crate) fn mirror(&mut self, canonical: &str, alias: &str) {
        let value = match self.attrs.get(canonical).or_else(|| self.attrs.get(alias)) {
            Some(value) => value.clone(),
            None => return,
        };
        self.attrs.insert(canonical.to_string(), value.clone());
        self.attrs.insert(alias.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AuditValue> {
        self.attrs.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a DiffView {
    type Item = (&'a String, &'a AuditValue);
    type IntoIter = btree_map::Iter<'a, String, AuditValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.attrs.iter()
    }
}

impl fmt::Display for DiffView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<DiffView")?;
        for (attr, value) in &self.attrs {
            write!(f, " {attr}={value}")?;
        }
        f.write_str(">")
    }
}
