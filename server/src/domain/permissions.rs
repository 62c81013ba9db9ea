//! Board role resolution and checks
//!
//! A user's role on a board comes from `boards.owner_id` (OWNER) or their
//! membership row (EDITOR/VIEWER). Nothing is cached; every check reads the store.

use std::sync::Arc;

use super::{Principal, ServiceError};
use crate::data::TransactionalRepository;
use crate::data::types::{BoardAccess, BoardRole, EntityKind};

const VIEW_DENIED: &str = "You do not have permission to view this board";
const EDIT_DENIED: &str = "You do not have permission to modify this board";
const OWNER_DENIED: &str = "Only the board owner can perform this action";

/// Effective role from ownership and membership
///
/// Ownership wins; a stray OWNER membership row without ownership grants nothing.
pub fn effective_role(access: &BoardAccess, user_id: &str) -> Option<BoardRole> {
    if access.owner_id == user_id {
        return Some(BoardRole::Owner);
    }
    access.member_role.filter(|role| *role != BoardRole::Owner)
}

#[derive(Clone)]
pub struct PermissionResolver {
    repo: Arc<dyn TransactionalRepository>,
}

impl PermissionResolver {
    pub fn new(repo: Arc<dyn TransactionalRepository>) -> Self {
        Self { repo }
    }

    /// Role of `user_id` on the board, `None` for strangers; NotFound if the board is missing
    pub async fn get_role(
        &self,
        board_id: &str,
        user_id: &str,
    ) -> Result<Option<BoardRole>, ServiceError> {
        let access = self
            .repo
            .get_board_access(board_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Board))?;
        Ok(effective_role(&access, user_id))
    }

    /// Any role passes
    pub async fn check_view(
        &self,
        board_id: &str,
        principal: &Principal,
    ) -> Result<BoardRole, ServiceError> {
        self.get_role(board_id, &principal.user_id)
            .await?
            .ok_or_else(|| ServiceError::denied(VIEW_DENIED))
    }

    /// OWNER or EDITOR
    pub async fn check_edit(
        &self,
        board_id: &str,
        principal: &Principal,
    ) -> Result<BoardRole, ServiceError> {
        match self.get_role(board_id, &principal.user_id).await? {
            Some(role) if role.can_edit() => Ok(role),
            _ => Err(ServiceError::denied(EDIT_DENIED)),
        }
    }

    pub async fn check_owner(
        &self,
        board_id: &str,
        principal: &Principal,
    ) -> Result<(), ServiceError> {
        match self.get_role(board_id, &principal.user_id).await? {
            Some(BoardRole::Owner) => Ok(()),
            _ => Err(ServiceError::denied(OWNER_DENIED)),
        }
    }
}
