//! Items and their custom values

use std::collections::HashMap;

use serde::Serialize;

use super::{Deps, validate_order};
use crate::core::constants::TITLE_MAX_LEN;
use crate::data::types::{
    ColumnRow, CommentRow, EntityKind, ItemRow, ItemValueMap, MoveOutcome, SectionRow, ValueChange,
    ValueWrite,
};
use crate::domain::activity::{Entry, json_value};
use crate::domain::fields::{ValueInput, require_text, validate_values};
use crate::domain::{Principal, ServiceError};

/// Item with its pivoted values and comments (oldest first)
#[derive(Debug, Clone)]
pub struct ItemView {
    pub item: ItemRow,
    pub values: ItemValueMap,
    pub comments: Vec<CommentRow>,
}

/// One section of the board view
#[derive(Debug, Clone)]
pub struct SectionItems {
    pub section: SectionRow,
    pub items: Vec<ItemView>,
}

#[derive(Serialize)]
struct ValueSnapshot<'a> {
    column: &'a str,
    value: Option<&'a str>,
}

#[derive(Serialize)]
struct Placement<'a> {
    section_id: &'a str,
    order: i64,
}

#[derive(Clone)]
pub struct ItemService {
    deps: Deps,
}

impl ItemService {
    pub(crate) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// Append an item to a section, with optional initial values
    pub async fn create_item(
        &self,
        principal: &Principal,
        section_id: &str,
        title: &str,
        values: ValueInput,
    ) -> Result<ItemView, ServiceError> {
        let board_id = self
            .deps
            .context
            .resolve_board_id(section_id, EntityKind::Section)
            .await?;
        self.deps.permissions.check_edit(&board_id, principal).await?;
        let title = require_text("Title", title, TITLE_MAX_LEN as usize)?;
        let writes = self.validate(&board_id, values).await?;

        let (item, changes) = self
            .deps
            .repo
            .create_item(section_id, &title, &writes)
            .await?;

        self.deps
            .activity
            .record(
                principal,
                &board_id,
                Entry::created(EntityKind::Item, &item.id, item.title.clone()),
            )
            .await;
        self.record_value_changes(principal, &board_id, &item.id, &changes)
            .await;

        let values = changes
            .into_iter()
            .filter_map(|c| c.new.map(|v| (c.column_name, v)))
            .collect();
        Ok(ItemView {
            item,
            values,
            comments: Vec::new(),
        })
    }

    /// Whole board: sections in rank order, each with its items in rank order
    pub async fn list_board_items(
        &self,
        principal: &Principal,
        board_id: &str,
    ) -> Result<Vec<SectionItems>, ServiceError> {
        self.deps.permissions.check_view(board_id, principal).await?;

        let sections = self.deps.repo.list_sections(board_id).await?;
        let items = self.deps.repo.list_items_for_board(board_id).await?;
        let mut values = self.deps.repo.pivot_item_values(board_id).await?;
        let mut comments: HashMap<String, Vec<CommentRow>> = HashMap::new();
        for comment in self.deps.repo.list_comments_for_board(board_id).await? {
            comments.entry(comment.item_id.clone()).or_default().push(comment);
        }

        let mut by_section: HashMap<String, Vec<ItemView>> = HashMap::new();
        for item in items {
            let view = ItemView {
                values: values.remove(&item.id).unwrap_or_default(),
                comments: comments.remove(&item.id).unwrap_or_default(),
                item,
            };
            by_section
                .entry(view.item.section_id.clone())
                .or_default()
                .push(view);
        }

        Ok(sections
            .into_iter()
            .map(|section| SectionItems {
                items: by_section.remove(&section.id).unwrap_or_default(),
                section,
            })
            .collect())
    }

    pub async fn get_item(&self, principal: &Principal, item_id: &str) -> Result<ItemView, ServiceError> {
        let board_id = self
            .deps
            .context
            .resolve_board_id(item_id, EntityKind::Item)
            .await?;
        self.deps.permissions.check_view(&board_id, principal).await?;
        self.load_view(item_id).await
    }

    /// Change the title and/or values
    ///
    /// Each value that actually changed gets its own activity entry.
    pub async fn update_item(
        &self,
        principal: &Principal,
        item_id: &str,
        title: Option<&str>,
        values: ValueInput,
    ) -> Result<ItemView, ServiceError> {
        let board_id = self.authorize(principal, item_id).await?;
        let title = title
            .map(|t| require_text("Title", t, TITLE_MAX_LEN as usize))
            .transpose()?;
        let writes = self.validate(&board_id, values).await?;

        let result = self
            .deps
            .repo
            .update_item(item_id, title.as_deref(), &writes)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Item))?;

        if result.before.title != result.after.title {
            self.deps
                .activity
                .record(
                    principal,
                    &board_id,
                    Entry::updated(
                        EntityKind::Item,
                        item_id,
                        Some(result.before.title),
                        Some(result.after.title),
                    ),
                )
                .await;
        }
        self.record_value_changes(principal, &board_id, item_id, &result.changes)
            .await;

        self.load_view(item_id).await
    }

    /// Delete an item with its values and comments
    pub async fn delete_item(&self, principal: &Principal, item_id: &str) -> Result<(), ServiceError> {
        let board_id = self.authorize(principal, item_id).await?;
        let removed = self
            .deps
            .repo
            .delete_item(item_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Item))?;

        self.deps
            .activity
            .record(
                principal,
                &board_id,
                Entry::deleted(EntityKind::Item, item_id, removed.title),
            )
            .await;
        Ok(())
    }

    /// Move within the current section, or into another section of the same board
    pub async fn move_item(
        &self,
        principal: &Principal,
        item_id: &str,
        section_id: Option<&str>,
        order: i64,
    ) -> Result<MoveOutcome, ServiceError> {
        let board_id = self.authorize(principal, item_id).await?;
        let order = validate_order(order)?;

        let target_section = match section_id {
            Some(section_id) => {
                let target_board = self
                    .deps
                    .context
                    .resolve_board_id(section_id, EntityKind::Section)
                    .await?;
                if target_board != board_id {
                    return Err(ServiceError::validation(
                        "Items can only be moved between sections of the same board",
                    ));
                }
                section_id.to_string()
            }
            None => {
                self.deps
                    .repo
                    .get_item(item_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found(EntityKind::Item))?
                    .section_id
            }
        };

        let outcome = self
            .deps
            .repo
            .move_item(item_id, &target_section, order)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Item))?;

        if outcome.moved() {
            let from = Placement {
                section_id: &outcome.old_parent_id,
                order: outcome.old_position,
            };
            let to = Placement {
                section_id: &outcome.new_parent_id,
                order: outcome.new_position,
            };
            self.deps
                .activity
                .record(
                    principal,
                    &board_id,
                    Entry::moved(EntityKind::Item, item_id, json_value(&from), json_value(&to)),
                )
                .await;
        }
        Ok(outcome)
    }

    async fn authorize(&self, principal: &Principal, item_id: &str) -> Result<String, ServiceError> {
        let board_id = self
            .deps
            .context
            .resolve_board_id(item_id, EntityKind::Item)
            .await?;
        self.deps.permissions.check_edit(&board_id, principal).await?;
        Ok(board_id)
    }

    async fn validate(
        &self,
        board_id: &str,
        values: ValueInput,
    ) -> Result<Vec<ValueWrite>, ServiceError> {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let columns: Vec<ColumnRow> = self.deps.repo.list_columns(board_id).await?;
        validate_values(&columns, values)
    }

    async fn load_view(&self, item_id: &str) -> Result<ItemView, ServiceError> {
        let item = self
            .deps
            .repo
            .get_item(item_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Item))?;
        let values = self.deps.repo.item_values(item_id).await?;
        let comments = self.deps.repo.list_comments(item_id).await?;
        Ok(ItemView {
            item,
            values,
            comments,
        })
    }

    async fn record_value_changes(
        &self,
        principal: &Principal,
        board_id: &str,
        item_id: &str,
        changes: &[ValueChange],
    ) {
        for change in changes {
            let snapshot = |value: Option<&str>| {
                json_value(&ValueSnapshot {
                    column: &change.column_name,
                    value,
                })
            };
            self.deps
                .activity
                .record(
                    principal,
                    board_id,
                    Entry::updated(
                        EntityKind::ItemValue,
                        item_id,
                        Some(snapshot(change.old.as_deref())),
                        Some(snapshot(change.new.as_deref())),
                    ),
                )
                .await;
        }
    }
}
