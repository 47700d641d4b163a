pub mod audit_log;
pub mod cache;
pub mod config;
pub mod error;

pub use audit_log::{
    AuditLog, AuditLogChanges, AuditLogContext, AuditLogEntry, AuditLogExtra, AuditTarget,
    AuditValue, DiffView, OverwriteTarget,
};
pub use cache::{GlobalCache, GlobalState, GuildCache, GuildSnapshot, GuildState};
pub use config::AuditLogConfig;
pub use error::{AuditLogError, TransformError};
