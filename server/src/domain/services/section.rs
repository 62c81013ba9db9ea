//! Sections: ranked containers of items within a board

use super::{Deps, validate_order};
use crate::data::types::{EntityKind, MoveOutcome, SectionRow, SectionWithCount};
use crate::domain::activity::Entry;
use crate::domain::fields::validate_name;
use crate::domain::{Principal, ServiceError};

#[derive(Clone)]
pub struct SectionService {
    deps: Deps,
}

impl SectionService {
    pub(crate) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// Append a section at the end of the board
    pub async fn create_section(
        &self,
        principal: &Principal,
        board_id: &str,
        name: &str,
    ) -> Result<SectionRow, ServiceError> {
        self.deps.permissions.check_edit(board_id, principal).await?;
        let name = validate_name("Section name", name)?;

        let section = self.deps.repo.create_section(board_id, &name).await?;
        self.deps
            .activity
            .record(
                principal,
                board_id,
                Entry::created(EntityKind::Section, &section.id, section.name.clone()),
            )
            .await;
        Ok(section)
    }

    /// Sections in rank order with their item counts
    pub async fn list_sections(
        &self,
        principal: &Principal,
        board_id: &str,
    ) -> Result<Vec<SectionWithCount>, ServiceError> {
        self.deps.permissions.check_view(board_id, principal).await?;
        Ok(self.deps.repo.list_sections_with_counts(board_id).await?)
    }

    pub async fn rename_section(
        &self,
        principal: &Principal,
        section_id: &str,
        name: &str,
    ) -> Result<SectionRow, ServiceError> {
        let board_id = self.authorize(principal, section_id).await?;
        let name = validate_name("Section name", name)?;

        let (before, after) = self
            .deps
            .repo
            .rename_section(section_id, &name)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Section))?;

        if before.name != after.name {
            self.deps
                .activity
                .record(
                    principal,
                    &board_id,
                    Entry::updated(
                        EntityKind::Section,
                        section_id,
                        Some(before.name),
                        Some(after.name.clone()),
                    ),
                )
                .await;
        }
        Ok(after)
    }

    /// Delete a section with its items and close the rank gap
    pub async fn delete_section(
        &self,
        principal: &Principal,
        section_id: &str,
    ) -> Result<(), ServiceError> {
        let board_id = self.authorize(principal, section_id).await?;
        let removed = self
            .deps
            .repo
            .delete_section(section_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Section))?;

        self.deps
            .activity
            .record(
                principal,
                &board_id,
                Entry::deleted(EntityKind::Section, section_id, removed.name),
            )
            .await;
        Ok(())
    }

    /// Move to `order`, clamped to the board's section range
    pub async fn move_section(
        &self,
        principal: &Principal,
        section_id: &str,
        order: i64,
    ) -> Result<MoveOutcome, ServiceError> {
        let board_id = self.authorize(principal, section_id).await?;
        let order = validate_order(order)?;

        let outcome = self
            .deps
            .repo
            .move_section(section_id, order)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Section))?;

        if outcome.moved() {
            self.deps
                .activity
                .record(
                    principal,
                    &board_id,
                    Entry::moved(
                        EntityKind::Section,
                        section_id,
                        outcome.old_position.to_string(),
                        outcome.new_position.to_string(),
                    ),
                )
                .await;
        }
        Ok(outcome)
    }

    async fn authorize(&self, principal: &Principal, section_id: &str) -> Result<String, ServiceError> {
        let board_id = self
            .deps
            .context
            .resolve_board_id(section_id, EntityKind::Section)
            .await?;
        self.deps.permissions.check_edit(&board_id, principal).await?;
        Ok(board_id)
    }
}
