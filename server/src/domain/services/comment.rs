//! Item comments

use super::Deps;
use crate::core::constants::COMMENT_MAX_LEN;
use crate::data::types::{BoardRole, CommentRow, EntityKind};
use crate::domain::activity::Entry;
use crate::domain::fields::require_text;
use crate::domain::{Principal, ServiceError};

#[derive(Clone)]
pub struct CommentService {
    deps: Deps,
}

impl CommentService {
    pub(crate) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    pub async fn create_comment(
        &self,
        principal: &Principal,
        item_id: &str,
        content: &str,
    ) -> Result<CommentRow, ServiceError> {
        let board_id = self
            .deps
            .context
            .resolve_board_id(item_id, EntityKind::Item)
            .await?;
        self.deps.permissions.check_edit(&board_id, principal).await?;
        let content = require_text("Comment", content, COMMENT_MAX_LEN as usize)?;

        let comment = self
            .deps
            .repo
            .create_comment(item_id, &principal.user_id, &content)
            .await?;
        self.deps
            .activity
            .record(
                principal,
                &board_id,
                Entry::created(EntityKind::Comment, &comment.id, comment.content.clone()),
            )
            .await;
        Ok(comment)
    }

    /// Comments of an item, oldest first
    pub async fn list_comments(
        &self,
        principal: &Principal,
        item_id: &str,
    ) -> Result<Vec<CommentRow>, ServiceError> {
        let board_id = self
            .deps
            .context
            .resolve_board_id(item_id, EntityKind::Item)
            .await?;
        self.deps.permissions.check_view(&board_id, principal).await?;
        Ok(self.deps.repo.list_comments(item_id).await?)
    }

    /// Delete a comment; only its author or the board owner may
    pub async fn delete_comment(
        &self,
        principal: &Principal,
        comment_id: &str,
    ) -> Result<(), ServiceError> {
        let comment = self
            .deps
            .repo
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Comment))?;
        let board_id = self
            .deps
            .context
            .resolve_board_id(&comment.item_id, EntityKind::Item)
            .await?;
        let role = self.deps.permissions.check_edit(&board_id, principal).await?;
        if comment.author_id != principal.user_id && role != BoardRole::Owner {
            return Err(ServiceError::denied(
                "Only the author or the board owner can delete this comment",
            ));
        }

        if !self.deps.repo.delete_comment(comment_id).await? {
            return Err(ServiceError::not_found(EntityKind::Comment));
        }
        self.deps
            .activity
            .record(
                principal,
                &board_id,
                Entry::deleted(EntityKind::Comment, comment_id, comment.content),
            )
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::testing::Fixture;

    #[tokio::test]
    async fn test_comments_listed_oldest_first() {
        let fx = Fixture::new().await;
        let board = fx.board("B").await;
        let section = fx.section(&board.id, "S").await;
        let item = fx.item(&section.id, "Task").await;
        let comments = &fx.services.comments;

        comments.create_comment(&fx.owner, &item.id, "first").await.unwrap();
        comments.create_comment(&fx.owner, &item.id, " second ").await.unwrap();

        let listed = comments.list_comments(&fx.owner, &item.id).await.unwrap();
        let contents: Vec<_> = listed.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(listed[0].author_name, "Owner");
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let fx = Fixture::new().await;
        let board = fx.board("B").await;
        let section = fx.section(&board.id, "S").await;
        let item = fx.item(&section.id, "Task").await;
        let alice = fx.member(&board.id, "alice", BoardRole::Editor).await;
        let bob = fx.member(&board.id, "bob", BoardRole::Editor).await;
        let comments = &fx.services.comments;

        let by_alice = comments.create_comment(&alice, &item.id, "mine").await.unwrap();
        let err = comments.delete_comment(&bob, &by_alice.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));

        comments.delete_comment(&alice, &by_alice.id).await.unwrap();

        let again = comments.create_comment(&alice, &item.id, "again").await.unwrap();
        comments.delete_comment(&fx.owner, &again.id).await.unwrap();
        assert!(comments.list_comments(&fx.owner, &item.id).await.unwrap().is_empty());

        let err = comments.delete_comment(&fx.owner, &again.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Comment not found"));
    }

    #[tokio::test]
    async fn test_viewer_cannot_comment() {
        let fx = Fixture::new().await;
        let board = fx.board("B").await;
        let section = fx.section(&board.id, "S").await;
        let item = fx.item(&section.id, "Task").await;
        let viewer = fx.member(&board.id, "viewer", BoardRole::Viewer).await;

        let err = fx
            .services
            .comments
            .create_comment(&viewer, &item.id, "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));
        fx.services.comments.list_comments(&viewer, &item.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_blank_comment_rejected() {
        let fx = Fixture::new().await;
        let board = fx.board("B").await;
        let section = fx.section(&board.id, "S").await;
        let item = fx.item(&section.id, "Task").await;

        let err = fx
            .services
            .comments
            .create_comment(&fx.owner, &item.id, "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
