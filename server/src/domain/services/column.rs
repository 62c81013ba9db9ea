//! Custom column definitions of a board

use serde::Serialize;

use super::{Deps, validate_order};
use crate::data::types::{ColumnRow, ColumnType, ColumnUpdate, EntityKind, MoveOutcome};
use crate::domain::activity::{Entry, json_value};
use crate::domain::fields::{self, ColumnInput, ColumnPatch};
use crate::domain::{Principal, ServiceError};

/// Audit form of a column definition
#[derive(Serialize)]
struct ColumnSnapshot<'a> {
    name: &'a str,
    data_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    formula_expression: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pruned_values: Option<u64>,
}

impl<'a> ColumnSnapshot<'a> {
    fn of(column: &'a ColumnRow) -> Self {
        Self {
            name: &column.name,
            data_type: column.data_type,
            options: (!column.options.is_empty()).then_some(column.options.as_slice()),
            formula_expression: column.formula_expression.as_deref(),
            pruned_values: None,
        }
    }
}

/// Merge attempts before a contended patch gives up
const UPDATE_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct ColumnService {
    deps: Deps,
}

impl ColumnService {
    pub(crate) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// Validate and append a column; duplicate names are a Conflict
    pub async fn define_column(
        &self,
        principal: &Principal,
        board_id: &str,
        input: ColumnInput,
    ) -> Result<ColumnRow, ServiceError> {
        self.deps.permissions.check_edit(board_id, principal).await?;
        let def = fields::define(input)?;

        let column = self.deps.repo.create_column(board_id, &def).await?;
        self.deps
            .activity
            .record(
                principal,
                board_id,
                Entry::created(
                    EntityKind::Column,
                    &column.id,
                    json_value(&ColumnSnapshot::of(&column)),
                ),
            )
            .await;
        Ok(column)
    }

    pub async fn list_columns(
        &self,
        principal: &Principal,
        board_id: &str,
    ) -> Result<Vec<ColumnRow>, ServiceError> {
        self.deps.permissions.check_view(board_id, principal).await?;
        Ok(self.deps.repo.list_columns(board_id).await?)
    }

    /// Apply a partial update
    ///
    /// The merged definition is validated as a whole. Stored values the new
    /// definition rejects are pruned in the same transaction.
    pub async fn update_column(
        &self,
        principal: &Principal,
        column_id: &str,
        patch: ColumnPatch,
    ) -> Result<ColumnRow, ServiceError> {
        let board_id = self.authorize(principal, column_id).await?;
        let mut current = self
            .deps
            .repo
            .get_column(column_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Column))?;
        if patch.is_empty() {
            return Ok(current);
        }

        // Merge onto the row the store holds at write time; a concurrent patch
        // makes the write stale and the merge is redone on the newer row.
        for _ in 0..UPDATE_ATTEMPTS {
            let expected = current.definition();
            let def = fields::merge_patch(&current, patch.clone())?;
            if def == expected {
                return Ok(current);
            }

            let update = self
                .deps
                .repo
                .update_column(column_id, &expected, &def)
                .await?
                .ok_or_else(|| ServiceError::not_found(EntityKind::Column))?;
            let (before, after, pruned) = match update {
                ColumnUpdate::Applied {
                    before,
                    after,
                    pruned,
                } => (before, after, pruned),
                ColumnUpdate::Stale(latest) => {
                    tracing::debug!(%column_id, "Column changed during update, merging again");
                    current = latest;
                    continue;
                }
            };

            if pruned > 0 {
                tracing::debug!(%column_id, pruned, "Pruned values rejected by new column definition");
            }
            let mut snapshot = ColumnSnapshot::of(&after);
            snapshot.pruned_values = (pruned > 0).then_some(pruned);
            self.deps
                .activity
                .record(
                    principal,
                    &board_id,
                    Entry::updated(
                        EntityKind::Column,
                        column_id,
                        Some(json_value(&ColumnSnapshot::of(&before))),
                        Some(json_value(&snapshot)),
                    ),
                )
                .await;
            return Ok(after);
        }

        Err(ServiceError::Conflict(
            "Column is being modified concurrently, try again".to_string(),
        ))
    }

    /// Delete a column with all of its values
    pub async fn delete_column(
        &self,
        principal: &Principal,
        column_id: &str,
    ) -> Result<(), ServiceError> {
        let board_id = self.authorize(principal, column_id).await?;
        let removed = self
            .deps
            .repo
            .delete_column(column_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Column))?;

        self.deps
            .activity
            .record(
                principal,
                &board_id,
                Entry::deleted(EntityKind::Column, column_id, removed.name),
            )
            .await;
        Ok(())
    }

    pub async fn move_column(
        &self,
        principal: &Principal,
        column_id: &str,
        order: i64,
    ) -> Result<MoveOutcome, ServiceError> {
        let board_id = self.authorize(principal, column_id).await?;
        let order = validate_order(order)?;

        let outcome = self
            .deps
            .repo
            .move_column(column_id, order)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Column))?;

        if outcome.moved() {
            self.deps
                .activity
                .record(
                    principal,
                    &board_id,
                    Entry::moved(
                        EntityKind::Column,
                        column_id,
                        outcome.old_position.to_string(),
                        outcome.new_position.to_string(),
                    ),
                )
                .await;
        }
        Ok(outcome)
    }

    async fn authorize(&self, principal: &Principal, column_id: &str) -> Result<String, ServiceError> {
        let board_id = self
            .deps
            .context
            .resolve_board_id(column_id, EntityKind::Column)
            .await?;
        self.deps.permissions.check_edit(&board_id, principal).await?;
        Ok(board_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::{ActivityAction, BoardRole};
    use crate::domain::fields::ValueInput;
    use crate::domain::testing::Fixture;

    fn select(name: &str, options: &[&str]) -> ColumnInput {
        ColumnInput {
            name: name.to_string(),
            data_type: ColumnType::Select,
            options: options.iter().map(|o| o.to_string()).collect(),
            formula_expression: None,
        }
    }

    #[tokio::test]
    async fn test_define_select_requires_options() {
        let fx = Fixture::new().await;
        let board = fx.board("B").await;

        let err = fx
            .services
            .columns
            .define_column(&fx.owner, &board.id, select("Status", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let column = fx
            .services
            .columns
            .define_column(&fx.owner, &board.id, select("Status", &["A", "B"]))
            .await
            .unwrap();
        assert_eq!(column.options, vec!["A", "B"]);
        assert_eq!(column.position, 0);

        let log = fx.activity(&board.id).await;
        assert_eq!(log[0].entity_type, EntityKind::Column);
        assert!(log[0].new_value.as_deref().unwrap().contains("\"SELECT\""));
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let fx = Fixture::new().await;
        let board = fx.board("B").await;
        fx.text_column(&board.id, "Notes").await;

        let err = fx
            .services
            .columns
            .define_column(&fx.owner, &board.id, select("Notes", &["A"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_prunes_dropped_options() {
        let fx = Fixture::new().await;
        let board = fx.board("B").await;
        let section = fx.section(&board.id, "S").await;
        let column = fx
            .services
            .columns
            .define_column(&fx.owner, &board.id, select("Status", &["A", "B"]))
            .await
            .unwrap();

        let mut values = ValueInput::new();
        values.insert(column.id.clone(), Some("B".into()));
        let view = fx
            .services
            .items
            .create_item(&fx.owner, &section.id, "Task", values)
            .await
            .unwrap();

        let updated = fx
            .services
            .columns
            .update_column(
                &fx.owner,
                &column.id,
                ColumnPatch {
                    options: Some(vec!["A".into(), "C".into()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.options, vec!["A", "C"]);

        let item = fx
            .services
            .items
            .get_item(&fx.owner, &view.item.id)
            .await
            .unwrap();
        assert!(item.values.is_empty());

        let log = fx.activity(&board.id).await;
        assert_eq!(log[0].action, ActivityAction::Update);
        assert!(log[0].new_value.as_deref().unwrap().contains("\"pruned_values\":1"));
    }

    #[tokio::test]
    async fn test_unchanged_update_not_logged() {
        let fx = Fixture::new().await;
        let board = fx.board("B").await;
        let column = fx.text_column(&board.id, "Notes").await;
        let before = fx.activity(&board.id).await.len();

        fx.services
            .columns
            .update_column(
                &fx.owner,
                &column.id,
                ColumnPatch {
                    name: Some("Notes".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(fx.activity(&board.id).await.len(), before);
    }

    #[tokio::test]
    async fn test_switch_to_select_needs_options() {
        let fx = Fixture::new().await;
        let board = fx.board("B").await;
        let column = fx.text_column(&board.id, "Notes").await;

        let err = fx
            .services
            .columns
            .update_column(
                &fx.owner,
                &column.id,
                ColumnPatch {
                    data_type: Some(ColumnType::Select),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_and_move_rerank() {
        let fx = Fixture::new().await;
        let board = fx.board("B").await;
        let a = fx.text_column(&board.id, "A").await;
        let b = fx.text_column(&board.id, "B").await;
        let c = fx.text_column(&board.id, "C").await;

        fx.services.columns.move_column(&fx.owner, &c.id, 0).await.unwrap();
        fx.services.columns.delete_column(&fx.owner, &a.id).await.unwrap();

        let columns = fx.services.columns.list_columns(&fx.owner, &board.id).await.unwrap();
        let order: Vec<_> = columns.iter().map(|c| (c.id.as_str(), c.position)).collect();
        assert_eq!(order, vec![(c.id.as_str(), 0), (b.id.as_str(), 1)]);
    }

    #[tokio::test]
    async fn test_viewer_cannot_define() {
        let fx = Fixture::new().await;
        let board = fx.board("B").await;
        let viewer = fx.member(&board.id, "viewer", BoardRole::Viewer).await;

        let err = fx
            .services
            .columns
            .define_column(&viewer, &board.id, select("Status", &["A"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));
        assert!(fx.services.columns.list_columns(&viewer, &board.id).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_partial_patches_keep_both_changes() {
        let dir = tempfile::tempdir().unwrap();
        let fx = Fixture::on_disk(&dir.path().join("board.db"), 8).await;
        let board = fx.board("B").await;

        let mut columns = Vec::new();
        for i in 0..20 {
            let column = fx
                .services
                .columns
                .define_column(&fx.owner, &board.id, select(&format!("Column {i}"), &["A"]))
                .await
                .unwrap();
            columns.push(column.id);
        }

        let mut tasks = tokio::task::JoinSet::new();
        for (i, column_id) in columns.iter().enumerate() {
            let rename = ColumnPatch {
                name: Some(format!("Renamed {i}")),
                ..Default::default()
            };
            let widen = ColumnPatch {
                options: Some(vec!["A".to_string(), "B".to_string()]),
                ..Default::default()
            };
            for patch in [rename, widen] {
                let services = fx.services.clone();
                let owner = fx.owner.clone();
                let column_id = column_id.clone();
                tasks.spawn(async move {
                    services
                        .columns
                        .update_column(&owner, &column_id, patch)
                        .await
                });
            }
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        let stored = fx
            .services
            .columns
            .list_columns(&fx.owner, &board.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 20);
        for column in stored {
            assert!(column.name.starts_with("Renamed "), "{}", column.name);
            assert_eq!(column.options, vec!["A", "B"]);
        }
    }
}
