use dashmap::DashMap;
use serde::Deserialize;

use auditcord_models::channel::Channel;
use auditcord_models::emoji::Emoji;
use auditcord_models::guild::Guild;
use auditcord_models::member::Member;
use auditcord_models::role::Role;
use auditcord_models::stage_instance::StageInstance;
use auditcord_models::sticker::GuildSticker;
use auditcord_models::user::User;

/// Read access to the state of the guild an audit log belongs to.
pub trait GuildCache: Send + Sync {
    fn guild(&self) -> &Guild;
    fn channel(&self, id: i64) -> Option<Channel>;
    fn thread(&self, id: i64) -> Option<Channel>;
    fn role(&self, id: i64) -> Option<Role>;
    fn member(&self, id: i64) -> Option<Member>;
    fn stage_instance(&self, id: i64) -> Option<StageInstance>;

    fn channel_or_thread(&self, id: i64) -> Option<Channel> {
        self.channel(id).or_else(|| self.thread(id))
    }
}

/// Read access to client-wide state.
pub trait GlobalCache: Send + Sync {
    fn guild(&self, id: i64) -> Option<Guild>;
    fn emoji(&self, id: i64) -> Option<Emoji>;
    fn sticker(&self, id: i64) -> Option<GuildSticker>;
    fn user(&self, id: i64) -> Option<User>;
}

/// A guild as delivered on guild create, with the collections the decoder looks into.
#[derive(Debug, Clone, Deserialize)]
pub struct GuildSnapshot {
    #[serde(flatten)]
    pub guild: Guild,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub threads: Vec<Channel>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub stage_instances: Vec<StageInstance>,
}

/// In-memory guild state.
/// Kept in sync by the caller; the decoder only reads from it.
pub struct GuildState {
    guild: Guild,
    channels: DashMap<i64, Channel>,
    threads: DashMap<i64, Channel>,
    roles: DashMap<i64, Role>,
    members: DashMap<i64, Member>,
    stage_instances: DashMap<i64, StageInstance>,
}

impl GuildState {
    /// Create an empty state for a guild (useful for tests).
    pub fn new(guild: Guild) -> Self {
        GuildState {
            guild,
            channels: DashMap::new(),
            threads: DashMap::new(),
            roles: DashMap::new(),
            members: DashMap::new(),
            stage_instances: DashMap::new(),
        }
    }

    pub fn from_snapshot(snapshot: GuildSnapshot) -> Self {
        let state = Self::new(snapshot.guild);
        for channel in snapshot.channels.into_iter().chain(snapshot.threads) {
            state.insert_channel(channel);
        }
        for role in snapshot.roles {
            state.insert_role(role);
        }
        for member in snapshot.members {
            state.insert_member(member);
        }
        for instance in snapshot.stage_instances {
            state.insert_stage_instance(instance);
        }
        tracing::info!(
            guild_id = state.guild.id,
            channels = state.channels.len(),
            threads = state.threads.len(),
            roles = state.roles.len(),
            members = state.members.len(),
            "guild state loaded"
        );
        state
    }

    /// Track a channel; threads are filed separately.
    pub fn insert_channel(&self, channel: Channel) {
        if channel.is_thread() {
            self.threads.insert(channel.id, channel);
        } else {
            self.channels.insert(channel.id, channel);
        }
    }

    pub fn insert_role(&self, role: Role) {
        self.roles.insert(role.id, role);
    }

    pub fn insert_member(&self, member: Member) {
        self.members.insert(member.user.id, member);
    }

    pub fn insert_stage_instance(&self, instance: StageInstance) {
        self.stage_instances.insert(instance.id, instance);
    }
}

impl GuildCache for GuildState {
    fn guild(&self) -> &Guild {
        &self.guild
    }

    fn channel(&self, id: i64) -> Option<Channel> {
        self.channels.get(&id).map(|c| c.clone())
    }

    fn thread(&self, id: i64) -> Option<Channel> {
        self.threads.get(&id).map(|t| t.clone())
    }

    fn role(&self, id: i64) -> Option<Role> {
        self.roles.get(&id).map(|r| r.clone())
    }

    fn member(&self, id: i64) -> Option<Member> {
        self.members.get(&id).map(|m| m.clone())
    }

    fn stage_instance(&self, id: i64) -> Option<StageInstance> {
        self.stage_instances.get(&id).map(|s| s.clone())
    }
}

/// In-memory client-wide state.
#[derive(Default)]
pub struct GlobalState {
    guilds: DashMap<i64, Guild>,
    emojis: DashMap<i64, Emoji>,
    stickers: DashMap<i64, GuildSticker>,
    users: DashMap<i64, User>,
}

impl GlobalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_guild(&self, guild: Guild) {
        self.guilds.insert(guild.id, guild);
    }

    pub fn insert_emoji(&self, emoji: Emoji) {
        self.emojis.insert(emoji.id, emoji);
    }

    pub fn insert_sticker(&self, sticker: GuildSticker) {
        self.stickers.insert(sticker.id, sticker);
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }
}

impl GlobalCache for GlobalState {
    fn guild(&self, id: i64) -> Option<Guild> {
        self.guilds.get(&id).map(|g| g.clone())
    }

    fn emoji(&self, id: i64) -> Option<Emoji> {
        self.emojis.get(&id).map(|e| e.clone())
    }

    fn sticker(&self, id: i64) -> Option<GuildSticker> {
        self.stickers.get(&id).map(|s| s.clone())
    }

    fn user(&self, id: i64) -> Option<User> {
        self.users.get(&id).map(|u| u.clone())
    }
}
