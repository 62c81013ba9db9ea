//! Board lifecycle and board-level reads

use super::Deps;
use crate::domain::activity::Entry;
use crate::domain::fields::validate_name;
use crate::domain::{Principal, ServiceError};
use crate::data::types::{ActivityRow, BoardRow, BoardWithRole, EntityKind};

#[derive(Clone)]
pub struct BoardService {
    deps: Deps,
}

impl BoardService {
    pub(crate) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// Create a board owned by the caller
    pub async fn create_board(
        &self,
        principal: &Principal,
        name: &str,
    ) -> Result<BoardRow, ServiceError> {
        let name = validate_name("Board name", name)?;
        let board = self
            .deps
            .repo
            .create_board_with_owner(&name, &principal.user_id)
            .await?;

        tracing::debug!(board_id = %board.id, "Board created");
        self.deps
            .activity
            .record(
                principal,
                &board.id,
                Entry::created(EntityKind::Board, &board.id, board.name.clone()),
            )
            .await;
        Ok(board)
    }

    /// Boards the caller owns or is a member of
    pub async fn list_boards(&self, principal: &Principal) -> Result<Vec<BoardWithRole>, ServiceError> {
        Ok(self.deps.repo.list_boards_for_user(&principal.user_id).await?)
    }

    pub async fn get_board(
        &self,
        principal: &Principal,
        board_id: &str,
    ) -> Result<BoardWithRole, ServiceError> {
        let role = self.deps.permissions.check_view(board_id, principal).await?;
        let board = self
            .deps
            .repo
            .get_board(board_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Board))?;
        Ok(BoardWithRole { board, role })
    }

    /// Rename; an unchanged name writes no activity
    pub async fn rename_board(
        &self,
        principal: &Principal,
        board_id: &str,
        name: &str,
    ) -> Result<BoardRow, ServiceError> {
        self.deps.permissions.check_edit(board_id, principal).await?;
        let name = validate_name("Board name", name)?;

        let (before, after) = self
            .deps
            .repo
            .rename_board(board_id, &name)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Board))?;

        if before.name != after.name {
            self.deps
                .activity
                .record(
                    principal,
                    board_id,
                    Entry::updated(
                        EntityKind::Board,
                        board_id,
                        Some(before.name),
                        Some(after.name.clone()),
                    ),
                )
                .await;
        }
        Ok(after)
    }

    /// Delete a board and everything under it
    pub async fn delete_board(&self, principal: &Principal, board_id: &str) -> Result<(), ServiceError> {
        self.deps.permissions.check_owner(board_id, principal).await?;
        if !self.deps.repo.delete_board(board_id).await? {
            return Err(ServiceError::not_found(EntityKind::Board));
        }
        tracing::debug!(%board_id, "Board deleted");
        Ok(())
    }

    /// Latest activity, newest first
    pub async fn list_activity(
        &self,
        principal: &Principal,
        board_id: &str,
    ) -> Result<Vec<ActivityRow>, ServiceError> {
        self.deps.permissions.check_view(board_id, principal).await?;
        self.deps.activity.list(board_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::{ActivityAction, BoardRole};
    use crate::domain::testing::Fixture;

    #[tokio::test]
    async fn test_create_board_makes_owner_membership() {
        let fx = Fixture::new().await;
        let board = fx.board("Roadmap").await;

        let boards = fx.services.boards.list_boards(&fx.owner).await.unwrap();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].board.id, board.id);
        assert_eq!(boards[0].role, BoardRole::Owner);

        let members = fx.services.members.list_members(&fx.owner, &board.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, fx.owner.user_id);
        assert_eq!(members[0].role, BoardRole::Owner);

        let log = fx.activity(&board.id).await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, ActivityAction::Create);
        assert_eq!(log[0].new_value.as_deref(), Some("Roadmap"));
    }

    #[tokio::test]
    async fn test_rename_logs_only_on_change() {
        let fx = Fixture::new().await;
        let board = fx.board("Roadmap").await;

        fx.services
            .boards
            .rename_board(&fx.owner, &board.id, "Roadmap")
            .await
            .unwrap();
        assert_eq!(fx.activity(&board.id).await.len(), 1);

        let renamed = fx
            .services
            .boards
            .rename_board(&fx.owner, &board.id, "  Plan  ")
            .await
            .unwrap();
        assert_eq!(renamed.name, "Plan");

        let log = fx.activity(&board.id).await;
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].action, ActivityAction::Update);
        assert_eq!(log[0].old_value.as_deref(), Some("Roadmap"));
        assert_eq!(log[0].new_value.as_deref(), Some("Plan"));
    }

    #[tokio::test]
    async fn test_editor_renames_but_cannot_delete() {
        let fx = Fixture::new().await;
        let board = fx.board("Roadmap").await;
        let editor = fx.member(&board.id, "editor", BoardRole::Editor).await;

        fx.services
            .boards
            .rename_board(&editor, &board.id, "Plan")
            .await
            .unwrap();
        let err = fx
            .services
            .boards
            .delete_board(&editor, &board.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));

        fx.services.boards.delete_board(&fx.owner, &board.id).await.unwrap();
        let err = fx
            .services
            .boards
            .get_board(&fx.owner, &board.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stranger_cannot_read() {
        let fx = Fixture::new().await;
        let board = fx.board("Roadmap").await;
        let stranger = fx.user("stranger").await;

        let err = fx
            .services
            .boards
            .get_board(&stranger, &board.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(ref m) if !m.contains("Roadmap")));
        assert!(fx.services.boards.list_boards(&stranger).await.unwrap().is_empty());
        assert!(
            fx.services
                .boards
                .list_activity(&stranger, &board.id)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let fx = Fixture::new().await;
        let err = fx
            .services
            .boards
            .create_board(&fx.owner, "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "Board name is required"));
    }
}
