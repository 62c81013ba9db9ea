//! Board membership management

use super::Deps;
use crate::data::types::{BoardRole, EntityKind, MemberUpsert, MemberWithUser};
use crate::domain::activity::Entry;
use crate::domain::{Principal, ServiceError};
use crate::utils::string::fold_email;

#[derive(Clone)]
pub struct MemberService {
    deps: Deps,
}

impl MemberService {
    pub(crate) fn new(deps: Deps) -> Self {
        Self { deps }
    }

    /// Add a user by email or change their role
    ///
    /// Only EDITOR and VIEWER can be granted; the owner's own role is fixed.
    pub async fn upsert_member(
        &self,
        principal: &Principal,
        board_id: &str,
        email: &str,
        role: BoardRole,
    ) -> Result<MemberWithUser, ServiceError> {
        self.deps.permissions.check_owner(board_id, principal).await?;
        if role == BoardRole::Owner {
            return Err(ServiceError::validation("Role must be EDITOR or VIEWER"));
        }

        let user = self
            .deps
            .repo
            .get_user_by_email(&fold_email(email))
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))?;
        let owner_id = self.owner_of(board_id).await?;
        if user.id == owner_id {
            return Err(ServiceError::validation(
                "The board owner's role cannot be changed",
            ));
        }

        let outcome = self.deps.repo.upsert_member(board_id, &user.id, role).await?;
        let entry = match outcome {
            MemberUpsert::Created(_) => Some(Entry::created(
                EntityKind::Member,
                &user.id,
                role.as_str(),
            )),
            MemberUpsert::Updated { previous, .. } => Some(Entry::updated(
                EntityKind::Member,
                &user.id,
                Some(previous.to_string()),
                Some(role.to_string()),
            )),
            MemberUpsert::Unchanged(_) => None,
        };
        if let Some(entry) = entry {
            self.deps.activity.record(principal, board_id, entry).await;
        }

        self.deps
            .repo
            .get_member(board_id, &user.id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Member))
    }

    /// Members with the owner first, then by name
    pub async fn list_members(
        &self,
        principal: &Principal,
        board_id: &str,
    ) -> Result<Vec<MemberWithUser>, ServiceError> {
        self.deps.permissions.check_view(board_id, principal).await?;
        Ok(self.deps.repo.list_members(board_id).await?)
    }

    pub async fn remove_member(
        &self,
        principal: &Principal,
        board_id: &str,
        user_id: &str,
    ) -> Result<(), ServiceError> {
        self.deps.permissions.check_owner(board_id, principal).await?;
        if user_id == self.owner_of(board_id).await? {
            return Err(ServiceError::validation("The board owner cannot be removed"));
        }

        let role = self
            .deps
            .repo
            .remove_member(board_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Member))?;
        self.deps
            .activity
            .record(
                principal,
                board_id,
                Entry::deleted(EntityKind::Member, user_id, role.as_str()),
            )
            .await;
        Ok(())
    }

    async fn owner_of(&self, board_id: &str) -> Result<String, ServiceError> {
        Ok(self
            .deps
            .repo
            .get_board(board_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Board))?
            .owner_id)
    }
}
