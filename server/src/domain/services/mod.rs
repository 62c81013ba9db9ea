//! Permission-checked domain operations
//!
//! Each mutation follows the same path: resolve the owning board, check the
//! caller's role, validate input, run one storage transaction, then record activity.

mod board;
mod column;
mod comment;
mod item;
mod member;
mod section;
mod user;

pub use board::BoardService;
pub use column::ColumnService;
pub use comment::CommentService;
pub use item::{ItemService, ItemView, SectionItems};
pub use member::MemberService;
pub use section::SectionService;
pub use user::{BootstrapAdmin, NewUserInput, UserPatch, UserService};

use std::sync::Arc;

use super::{ActivityLog, BoardContextResolver, PermissionResolver, ServiceError};
use crate::data::TransactionalRepository;

/// Collaborators shared by every service
#[derive(Clone)]
pub(crate) struct Deps {
    pub repo: Arc<dyn TransactionalRepository>,
    pub permissions: PermissionResolver,
    pub context: BoardContextResolver,
    pub activity: ActivityLog,
}

/// All domain services over one repository
#[derive(Clone)]
pub struct Services {
    repo: Arc<dyn TransactionalRepository>,
    pub permissions: PermissionResolver,
    pub context: BoardContextResolver,
    pub activity: ActivityLog,
    pub users: UserService,
    pub boards: BoardService,
    pub sections: SectionService,
    pub columns: ColumnService,
    pub items: ItemService,
    pub comments: CommentService,
    pub members: MemberService,
}

impl Services {
    pub fn new(repo: Arc<dyn TransactionalRepository>) -> Self {
        let deps = Deps {
            permissions: PermissionResolver::new(repo.clone()),
            context: BoardContextResolver::new(repo.clone()),
            activity: ActivityLog::new(repo.clone()),
            repo,
        };

        Self {
            repo: deps.repo.clone(),
            permissions: deps.permissions.clone(),
            context: deps.context.clone(),
            activity: deps.activity.clone(),
            users: UserService::new(deps.repo.clone()),
            boards: BoardService::new(deps.clone()),
            sections: SectionService::new(deps.clone()),
            columns: ColumnService::new(deps.clone()),
            items: ItemService::new(deps.clone()),
            comments: CommentService::new(deps.clone()),
            members: MemberService::new(deps),
        }
    }

    /// Store round-trip for health checks
    pub async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.repo.ping().await?)
    }
}

/// Reject negative move targets; larger ones are clamped by the store
pub(crate) fn validate_order(order: i64) -> Result<i64, ServiceError> {
    if order < 0 {
        return Err(ServiceError::validation("order must be a non-negative integer"));
    }
    Ok(order)
}
