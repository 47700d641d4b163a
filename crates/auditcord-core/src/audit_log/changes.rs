use serde::Serialize;
use serde_json::Value;
use std::fmt;

use auditcord_models::audit_log::ChangeRecord;
use auditcord_models::object::{Object, Resolved};
use auditcord_util::snowflake;

use super::entry::AuditLogEntry;
use super::transformers;
use super::value::{AuditValue, DiffView};
use crate::error::{AuditLogError, TransformError};

/// `(canonical, alias)` spellings stored under both names once all records are applied.
const ALIASES: &[(&str, &str)] = &[("colour", "color"), ("expire_behavior", "expire_behaviour")];

/// The decoded `before` and `after` views of an entry's changes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditLogChanges {
    pub before: DiffView,
    pub after: DiffView,
}

impl AuditLogChanges {
    pub(crate) fn from_records(
        entry: &AuditLogEntry,
        records: &[ChangeRecord],
    ) -> Result<Self, AuditLogError> {
        let mut changes = Self::default();
        for record in records {
            match record.key.as_str() {
                "$add" => {
                    let roles = resolve_partial_roles(entry, record.new_value.as_ref())?;
                    changes.after.extend_list("roles", roles);
                }
                "$remove" => {
                    let roles = resolve_partial_roles(entry, record.new_value.as_ref())?;
                    changes.before.extend_list("roles", roles);
                }
                key => changes.apply(entry, key, record)?,
            }
        }
        for view in [&mut changes.before, &mut changes.after] {
            for (canonical, alias) in ALIASES {
                view.mirror(canonical, alias);
            }
        }
        Ok(changes)
    }

    fn apply(
        &mut self,
        entry: &AuditLogEntry,
        key: &str,
        record: &ChangeRecord,
    ) -> Result<(), AuditLogError> {
        let field = transformers::lookup(key);
        let attr = field.and_then(|f| f.rename).unwrap_or(key);
        let transform = field.and_then(|f| f.transform);
        if field.is_none() {
            tracing::debug!(key, action = %entry.action, "passing change through untransformed");
        }

        let decode = |side: Option<&Value>| -> Result<AuditValue, AuditLogError> {
            let Some(raw) = side else {
                return Ok(AuditValue::None);
            };
            match transform {
                Some(transform) => {
                    transform(entry, raw).map_err(|source| AuditLogError::InvalidChange {
                        key: key.to_string(),
                        source,
                    })
                }
                None => Ok(AuditValue::Raw(raw.clone())),
            }
        };

        let before = decode(record.old_value.as_ref())?;
        let after = decode(record.new_value.as_ref())?;
        self.before.insert(attr, before);
        self.after.insert(attr, after);
        Ok(())
    }

    /// Attributes whose before and after values differ in their rendered form.
    pub fn changed_keys(&self) -> impl Iterator<Item = &str> {
        self.after.keys().filter(move |attr| {
            match (self.before.get(attr), self.after.get(attr)) {
                (Some(old), Some(new)) => old.to_string() != new.to_string(),
                _ => true,
            }
        })
    }
}

impl fmt::Display for AuditLogChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<AuditLogChanges before={} after={}>", self.before, self.after)
    }
}

/// Resolve the `{id, name}` role stubs carried by `$add` and `$remove`.
fn resolve_partial_roles(
    entry: &AuditLogEntry,
    data: Option<&Value>,
) -> Result<Vec<AuditValue>, AuditLogError> {
    let items = match data {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(AuditLogError::InvalidChange {
                key: "roles".into(),
                source: TransformError::unexpected("a list of roles", other),
            })
        }
    };

    items
        .iter()
        .map(|item| {
            let id = item
                .get("id")
                .and_then(snowflake::from_value)
                .ok_or_else(|| AuditLogError::InvalidChange {
                    key: "roles".into(),
                    source: TransformError::unexpected("a role with an id", item),
                })?;
            let role = match entry.guild().role(id) {
                Some(role) => Resolved::Cached(role),
                None => Resolved::Object(Object {
                    id,
                    name: item.get("name").and_then(Value::as_str).map(str::to_string),
                }),
            };
            Ok(AuditValue::Role(role))
        })
        .collect()
}
