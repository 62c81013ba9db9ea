//! Child entity -> owning board resolution

use std::sync::Arc;

use super::ServiceError;
use crate::data::TransactionalRepository;
use crate::data::types::EntityKind;

#[derive(Clone)]
pub struct BoardContextResolver {
    repo: Arc<dyn TransactionalRepository>,
}

impl BoardContextResolver {
    pub fn new(repo: Arc<dyn TransactionalRepository>) -> Self {
        Self { repo }
    }

    /// Owning board of `entity_id`; NotFound named for the entity when it is missing
    ///
    /// Only BOARD, SECTION, COLUMN and ITEM carry a board context.
    pub async fn resolve_board_id(
        &self,
        entity_id: &str,
        kind: EntityKind,
    ) -> Result<String, ServiceError> {
        let board_id = match kind {
            EntityKind::Board => self
                .repo
                .board_exists(entity_id)
                .await?
                .then(|| entity_id.to_string()),
            EntityKind::Section => self.repo.get_section_board(entity_id).await?,
            EntityKind::Column => self.repo.get_column_board(entity_id).await?,
            EntityKind::Item => self.repo.get_item_board(entity_id).await?,
            other => {
                return Err(ServiceError::Internal(format!(
                    "no board context for {}",
                    other.as_str()
                )));
            }
        };
        board_id.ok_or_else(|| ServiceError::not_found(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::testing::Fixture;

    #[tokio::test]
    async fn test_resolves_each_kind() {
        let fx = Fixture::new().await;
        let board = fx.board("B").await;
        let section = fx.section(&board.id, "S").await;
        let item = fx.item(&section.id, "I").await;
        let column = fx.text_column(&board.id, "C").await;
        let ctx = &fx.services.context;

        for (id, kind) in [
            (board.id.as_str(), EntityKind::Board),
            (section.id.as_str(), EntityKind::Section),
            (column.id.as_str(), EntityKind::Column),
            (item.id.as_str(), EntityKind::Item),
        ] {
            assert_eq!(ctx.resolve_board_id(id, kind).await.unwrap(), board.id);
        }
    }

    #[tokio::test]
    async fn test_missing_entities_named() {
        let fx = Fixture::new().await;
        let ctx = &fx.services.context;

        for (kind, message) in [
            (EntityKind::Board, "Board not found"),
            (EntityKind::Section, "Section not found"),
            (EntityKind::Column, "Column not found"),
            (EntityKind::Item, "Item not found"),
        ] {
            let err = ctx.resolve_board_id("missing", kind).await.unwrap_err();
            assert!(matches!(err, ServiceError::NotFound(ref m) if m == message));
        }
    }
}
