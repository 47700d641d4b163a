//! Decoding of guild audit-log pages into typed entries.
//!
//! An [`AuditLog`] is built from the raw endpoint payload and the guild and
//! client caches. Each [`AuditLogEntry`] decodes its changes and target on
//! first access.

pub mod changes;
pub mod entry;
pub mod extra;
pub mod target;
pub mod transformers;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use changes::AuditLogChanges;
pub use entry::{AuditLogContext, AuditLogEntry};
pub use extra::AuditLogExtra;
pub use target::{AuditTarget, TargetResolver};
pub use value::{AuditValue, DiffView, OverwriteTarget};

use std::sync::Arc;

use auditcord_models::audit_log::AuditLogPayload;

use crate::cache::{GlobalCache, GuildCache};
use crate::config::AuditLogConfig;
use crate::error::AuditLogError;

/// One decoded page of a guild's audit log, in payload order.
#[derive(Debug)]
pub struct AuditLog {
    pub entries: Vec<AuditLogEntry>,
}

impl AuditLog {
    /// Decode every entry, failing on the first entry whose options are malformed.
    pub fn from_payload(
        payload: AuditLogPayload,
        guild: Arc<dyn GuildCache>,
        global: Arc<dyn GlobalCache>,
        config: AuditLogConfig,
    ) -> Result<Self, AuditLogError> {
        let (ctx, entries) = AuditLogContext::for_page(payload, guild, global, config);
        let entries = entries
            .into_iter()
            .map(|entry| AuditLogEntry::from_payload(entry, Arc::clone(&ctx)))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(entries = entries.len(), "decoded audit log page");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AuditLogEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a AuditLog {
    type Item = &'a AuditLogEntry;
    type IntoIter = std::slice::Iter<'a, AuditLogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
