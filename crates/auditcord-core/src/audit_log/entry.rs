use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use auditcord_models::audit_log::{
    AuditLogAction, AuditLogActionCategory, AuditLogEntryPayload, AuditLogPayload, ChangeRecord,
};
use auditcord_models::auto_moderation::AutoModerationRule;
use auditcord_models::enums::TolerantEnum;
use auditcord_models::member::MemberOrUser;
use auditcord_models::user::User;
use auditcord_util::snowflake;

use super::changes::AuditLogChanges;
use super::extra::{self, AuditLogExtra};
use super::target::{self, AuditTarget};
use super::value::DiffView;
use crate::cache::{GlobalCache, GuildCache};
use crate::config::AuditLogConfig;
use crate::error::AuditLogError;

/// State shared by every entry of one audit-log page.
pub struct AuditLogContext {
    guild: Arc<dyn GuildCache>,
    global: Arc<dyn GlobalCache>,
    users: HashMap<i64, User>,
    auto_moderation_rules: HashMap<i64, AutoModerationRule>,
    config: AuditLogConfig,
}

impl AuditLogContext {
    pub fn new(
        guild: Arc<dyn GuildCache>,
        global: Arc<dyn GlobalCache>,
        config: AuditLogConfig,
    ) -> Self {
        Self {
            guild,
            global,
            users: HashMap::new(),
            auto_moderation_rules: HashMap::new(),
            config,
        }
    }

    /// Context for one page: the caches plus the users and rules the page
    /// embeds. The page's raw entries are handed back for decoding.
    pub fn for_page(
        page: AuditLogPayload,
        guild: Arc<dyn GuildCache>,
        global: Arc<dyn GlobalCache>,
        config: AuditLogConfig,
    ) -> (Arc<Self>, Vec<AuditLogEntryPayload>) {
        let ctx = Self::new(guild, global, config)
            .with_users(page.users)
            .with_auto_moderation_rules(page.auto_moderation_rules);
        (Arc::new(ctx), page.audit_log_entries)
    }

    /// Users embedded in the payload, consulted after the member cache.
    pub fn with_users(mut self, users: impl IntoIterator<Item = User>) -> Self {
        self.users.extend(users.into_iter().map(|u| (u.id, u)));
        self
    }

    pub fn with_auto_moderation_rules(
        mut self,
        rules: impl IntoIterator<Item = AutoModerationRule>,
    ) -> Self {
        self.auto_moderation_rules
            .extend(rules.into_iter().map(|r| (r.id, r)));
        self
    }

    pub fn guild(&self) -> &dyn GuildCache {
        self.guild.as_ref()
    }

    pub fn global(&self) -> &dyn GlobalCache {
        self.global.as_ref()
    }

    pub fn config(&self) -> &AuditLogConfig {
        &self.config
    }

    /// Member of the guild when cached, else a payload user, else a globally cached user.
    pub fn member_or_user(&self, id: i64) -> Option<MemberOrUser> {
        if let Some(member) = self.guild.member(id) {
            return Some(MemberOrUser::Member(member));
        }
        self.users
            .get(&id)
            .cloned()
            .or_else(|| self.global.user(id))
            .map(MemberOrUser::User)
    }
}

enum ChangeState {
    Raw(Vec<ChangeRecord>),
    Decoded(Arc<AuditLogChanges>),
}

/// One decoded audit-log entry.
///
/// `extra` is decoded on construction. Changes and the target are decoded
/// on first access and cached; a failed change decode is retried on the next call.
pub struct AuditLogEntry {
    pub id: i64,
    pub action: AuditLogAction,
    pub user_id: Option<i64>,
    pub user: Option<MemberOrUser>,
    pub target_id: Option<i64>,
    pub reason: Option<String>,
    pub extra: AuditLogExtra,
    ctx: Arc<AuditLogContext>,
    changes: Mutex<ChangeState>,
    target: OnceLock<Option<AuditTarget>>,
}

impl AuditLogEntry {
    pub fn from_payload(
        payload: AuditLogEntryPayload,
        ctx: Arc<AuditLogContext>,
    ) -> Result<Self, AuditLogError> {
        let user = payload.user_id.and_then(|id| ctx.member_or_user(id));
        let mut entry = Self {
            id: payload.id,
            action: payload.action_type,
            user_id: payload.user_id,
            user,
            target_id: payload.target_id,
            reason: payload.reason,
            extra: AuditLogExtra::Empty,
            ctx,
            changes: Mutex::new(ChangeState::Raw(payload.changes)),
            target: OnceLock::new(),
        };
        entry.extra = extra::decode(&entry, payload.options.as_ref())?;
        if entry.action.is_unknown() {
            tracing::debug!(entry_id = entry.id, action = %entry.action, "unrecognized audit log action");
        }
        tracing::trace!(entry_id = entry.id, action = %entry.action, "decoded audit log entry");
        Ok(entry)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        snowflake::created_at(self.id)
    }

    pub fn category(&self) -> Option<AuditLogActionCategory> {
        self.action.category()
    }

    pub fn changes(&self) -> Result<Arc<AuditLogChanges>, AuditLogError> {
        let mut state = self.changes.lock().unwrap_or_else(PoisonError::into_inner);
        let records = match &*state {
            ChangeState::Decoded(changes) => return Ok(Arc::clone(changes)),
            ChangeState::Raw(records) => records,
        };
        let decoded = Arc::new(AuditLogChanges::from_records(self, records)?);
        *state = ChangeState::Decoded(Arc::clone(&decoded));
        Ok(decoded)
    }

    pub fn before(&self) -> Result<DiffView, AuditLogError> {
        Ok(self.changes()?.before.clone())
    }

    pub fn after(&self) -> Result<DiffView, AuditLogError> {
        Ok(self.changes()?.after.clone())
    }

    /// The entity acted upon. `Ok(None)` when nothing can be resolved.
    pub fn target(&self) -> Result<Option<&AuditTarget>, AuditLogError> {
        if let Some(target) = self.target.get() {
            return Ok(target.as_ref());
        }
        let resolved = target::resolve(self)?;
        Ok(self.target.get_or_init(|| resolved).as_ref())
    }

    pub fn guild(&self) -> &dyn GuildCache {
        self.ctx.guild()
    }

    pub(crate) fn global(&self) -> &dyn GlobalCache {
        self.ctx.global()
    }

    pub(crate) fn config(&self) -> &AuditLogConfig {
        self.ctx.config()
    }

    pub(crate) fn member_or_user(&self, id: i64) -> Option<MemberOrUser> {
        self.ctx.member_or_user(id)
    }

    pub(crate) fn auto_moderation_rule(&self, id: i64) -> Option<&AutoModerationRule> {
        self.ctx.auto_moderation_rules.get(&id)
    }
}

impl fmt::Debug for AuditLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLogEntry")
            .field("id", &self.id)
            .field("action", &self.action)
            .field("user_id", &self.user_id)
            .field("target_id", &self.target_id)
            .field("reason", &self.reason)
            .field("extra", &self.extra)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for AuditLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<AuditLogEntry id={} action={}", self.id, self.action)?;
        match &self.user {
            Some(user) => write!(f, " user={}", user.display_name())?,
            None => write!(f, " user=None")?,
        }
        f.write_str(">")
    }
}
