//! Best-effort audit trail
//!
//! Entries are written after the triggering transaction commits. A failed write is
//! reported through `tracing` and never reaches the caller.

use std::sync::Arc;

use serde::Serialize;

use super::{Principal, ServiceError};
use crate::core::constants::{ACTIVITY_LIST_LIMIT, ACTIVITY_VALUE_MAX_LEN};
use crate::data::TransactionalRepository;
use crate::data::types::{ActivityAction, ActivityRow, EntityKind, NewActivity};
use crate::utils::string::truncate_chars;

/// Stringify a structured value for an audit column
pub fn json_value<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// One audit record before it is attributed to an actor and board
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub action: ActivityAction,
    pub entity_type: EntityKind,
    pub entity_id: &'a str,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl<'a> Entry<'a> {
    pub fn created(entity_type: EntityKind, entity_id: &'a str, new_value: impl Into<String>) -> Self {
        Self {
            action: ActivityAction::Create,
            entity_type,
            entity_id,
            old_value: None,
            new_value: Some(new_value.into()),
        }
    }

    pub fn updated(
        entity_type: EntityKind,
        entity_id: &'a str,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            action: ActivityAction::Update,
            entity_type,
            entity_id,
            old_value,
            new_value,
        }
    }

    pub fn deleted(entity_type: EntityKind, entity_id: &'a str, old_value: impl Into<String>) -> Self {
        Self {
            action: ActivityAction::Delete,
            entity_type,
            entity_id,
            old_value: Some(old_value.into()),
            new_value: None,
        }
    }

    pub fn moved(
        entity_type: EntityKind,
        entity_id: &'a str,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        Self {
            action: ActivityAction::Move,
            entity_type,
            entity_id,
            old_value: Some(old_value.into()),
            new_value: Some(new_value.into()),
        }
    }
}

#[derive(Clone)]
pub struct ActivityLog {
    repo: Arc<dyn TransactionalRepository>,
}

impl ActivityLog {
    pub fn new(repo: Arc<dyn TransactionalRepository>) -> Self {
        Self { repo }
    }

    /// Append an entry; failures are logged and swallowed
    pub async fn record(&self, principal: &Principal, board_id: &str, entry: Entry<'_>) {
        let row = NewActivity {
            board_id: board_id.to_string(),
            actor_id: principal.user_id.clone(),
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id.to_string(),
            old_value: entry
                .old_value
                .map(|v| truncate_chars(&v, ACTIVITY_VALUE_MAX_LEN)),
            new_value: entry
                .new_value
                .map(|v| truncate_chars(&v, ACTIVITY_VALUE_MAX_LEN)),
        };

        if let Err(e) = self.repo.insert_activity(&row).await {
            tracing::warn!(
                %board_id,
                action = %row.action,
                entity_type = %row.entity_type,
                entity_id = %row.entity_id,
                error = %e,
                "Failed to record activity"
            );
        }
    }

    /// Latest entries for a board, newest first (caller checks view permission)
    pub async fn list(&self, board_id: &str) -> Result<Vec<ActivityRow>, ServiceError> {
        Ok(self.repo.list_activity(board_id, ACTIVITY_LIST_LIMIT).await?)
    }
}
