//! Service-level test fixture over an in-memory store

use std::path::Path;
use std::sync::Arc;

use super::fields::{ColumnInput, ValueInput};
use super::{Principal, Services};
use crate::data::types::{
    ActivityRow, BoardRole, BoardRow, ColumnRow, ColumnType, ItemRow, NewUser, SectionRow, UserRole,
};
use crate::data::{SqliteService, TransactionalRepository};

pub struct Fixture {
    pub db: Arc<SqliteService>,
    pub services: Services,
    /// Plain member who owns every board created through the fixture
    pub owner: Principal,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_db(SqliteService::in_memory().await).await
    }

    /// File-backed store with a multi-connection pool, for concurrency tests
    pub async fn on_disk(path: &Path, max_connections: u32) -> Self {
        let db = SqliteService::open(path, max_connections).await.unwrap();
        Self::with_db(Arc::new(db)).await
    }

    async fn with_db(db: Arc<SqliteService>) -> Self {
        let repo: Arc<dyn TransactionalRepository> = Arc::new(db.clone());
        let services = Services::new(repo);
        let owner = insert_user(&db, "Owner", UserRole::Member).await;
        Self {
            db,
            services,
            owner,
        }
    }

    /// Active MEMBER with email `<name>@example.com`
    pub async fn user(&self, name: &str) -> Principal {
        insert_user(&self.db, name, UserRole::Member).await
    }

    pub async fn admin(&self, name: &str) -> Principal {
        insert_user(&self.db, name, UserRole::Admin).await
    }

    pub async fn board(&self, name: &str) -> BoardRow {
        self.services
            .boards
            .create_board(&self.owner, name)
            .await
            .unwrap()
    }

    /// New user granted `role` on the board
    pub async fn member(&self, board_id: &str, name: &str, role: BoardRole) -> Principal {
        let principal = self.user(name).await;
        self.services
            .members
            .upsert_member(
                &self.owner,
                board_id,
                &format!("{}@example.com", name.to_lowercase()),
                role,
            )
            .await
            .unwrap();
        principal
    }

    pub async fn section(&self, board_id: &str, name: &str) -> SectionRow {
        self.services
            .sections
            .create_section(&self.owner, board_id, name)
            .await
            .unwrap()
    }

    pub async fn item(&self, section_id: &str, title: &str) -> ItemRow {
        self.services
            .items
            .create_item(&self.owner, section_id, title, ValueInput::new())
            .await
            .unwrap()
            .item
    }

    pub async fn text_column(&self, board_id: &str, name: &str) -> ColumnRow {
        self.services
            .columns
            .define_column(
                &self.owner,
                board_id,
                ColumnInput {
                    name: name.to_string(),
                    data_type: ColumnType::Text,
                    options: Vec::new(),
                    formula_expression: None,
                },
            )
            .await
            .unwrap()
    }

    /// Activity of a board, newest first
    pub async fn activity(&self, board_id: &str) -> Vec<ActivityRow> {
        self.services.activity.list(board_id).await.unwrap()
    }
}

async fn insert_user(db: &Arc<SqliteService>, name: &str, role: UserRole) -> Principal {
    let user = crate::data::sqlite::repositories::user::create_user(
        db.pool(),
        &NewUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "x".to_string(),
            role,
        },
    )
    .await
    .unwrap();
    Principal {
        user_id: user.id,
        role,
    }
}
