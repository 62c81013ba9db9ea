//! Accounts, authentication and the first-run administrator

use std::sync::Arc;

use crate::core::constants::PASSWORD_MIN_LEN;
use crate::data::TransactionalRepository;
use crate::data::types::{NewUser, UserRole, UserRow, UserUpdate};
use crate::domain::credentials::{hash_password, verify_password};
use crate::domain::fields::validate_name;
use crate::domain::{Principal, ServiceError};
use crate::utils::crypto::generate_token;
use crate::utils::string::fold_email;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const ADMIN_REQUIRED: &str = "Administrator access required";
const EMAIL_MAX_LEN: usize = 254;

/// Fields for a new account
#[derive(Debug, Clone)]
pub struct NewUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
}

/// Partial account update; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

/// Administrator created on an empty database
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    /// Set when no password was configured
    pub generated_password: Option<String>,
}

fn validate_email(email: &str) -> Result<String, ServiceError> {
    let email = fold_email(email);
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !valid || email.len() > EMAIL_MAX_LEN {
        return Err(ServiceError::validation("A valid email address is required"));
    }
    Ok(email)
}

fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.chars().count() < PASSWORD_MIN_LEN as usize {
        return Err(ServiceError::validation(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LEN
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn TransactionalRepository>,
}

impl UserService {
    pub(crate) fn new(repo: Arc<dyn TransactionalRepository>) -> Self {
        Self { repo }
    }

    /// Check credentials; every failure looks the same to the caller
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserRow, ServiceError> {
        let (user, digest) = match self.repo.get_credentials(&fold_email(email)).await? {
            Some((user, digest)) => (Some(user), Some(digest)),
            None => (None, None),
        };
        // Unknown emails still pay for a verification
        let verified = verify_password(password.to_string(), digest).await?;
        match user {
            Some(user) if user.is_active && verified => Ok(user),
            Some(user) => {
                tracing::debug!(user_id = %user.id, "Rejected login");
                Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.into()))
            }
            None => Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.into())),
        }
    }

    /// Fresh lookup of a token subject; inactive or missing users are rejected
    pub async fn principal_for(&self, user_id: &str) -> Result<(UserRow, Principal), ServiceError> {
        let user = self
            .repo
            .get_user(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| ServiceError::Unauthorized("Session is no longer valid".into()))?;
        let principal = Principal {
            user_id: user.id.clone(),
            role: user.role,
        };
        Ok((user, principal))
    }

    /// Active users ordered by name
    pub async fn list_users(&self) -> Result<Vec<UserRow>, ServiceError> {
        Ok(self.repo.list_active_users().await?)
    }

    pub async fn create_user(
        &self,
        principal: &Principal,
        input: NewUserInput,
    ) -> Result<UserRow, ServiceError> {
        if !principal.is_admin() {
            return Err(ServiceError::denied(ADMIN_REQUIRED));
        }
        let name = validate_name("Name", &input.name)?;
        let email = validate_email(&input.email)?;
        validate_password(&input.password)?;

        let user = self
            .repo
            .create_user(&NewUser {
                name,
                email,
                password_hash: hash_password(input.password).await?,
                role: input.role.unwrap_or_default(),
            })
            .await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Update self, or anyone as an administrator; only administrators change roles
    pub async fn update_user(
        &self,
        principal: &Principal,
        user_id: &str,
        patch: UserPatch,
    ) -> Result<UserRow, ServiceError> {
        if principal.user_id != user_id && !principal.is_admin() {
            return Err(ServiceError::denied("You can only update your own account"));
        }
        if patch.role.is_some() && !principal.is_admin() {
            return Err(ServiceError::denied("Only administrators can change roles"));
        }

        let update = UserUpdate {
            name: patch
                .name
                .map(|n| validate_name("Name", &n))
                .transpose()?,
            email: patch.email.map(|e| validate_email(&e)).transpose()?,
            role: patch.role,
            password_hash: match patch.password {
                Some(password) => {
                    validate_password(&password)?;
                    Some(hash_password(password).await?)
                }
                None => None,
            },
        };

        self.repo
            .update_user(user_id, &update)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))
    }

    /// Soft delete: mark inactive and rename
    pub async fn deactivate_user(
        &self,
        principal: &Principal,
        user_id: &str,
    ) -> Result<UserRow, ServiceError> {
        if !principal.is_admin() {
            return Err(ServiceError::denied(ADMIN_REQUIRED));
        }
        if principal.user_id == user_id {
            return Err(ServiceError::validation("You cannot deactivate your own account"));
        }
        let user = self
            .repo
            .deactivate_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))?;
        tracing::info!(%user_id, "User deactivated");
        Ok(user)
    }

    /// Create the first administrator when no users exist
    pub async fn bootstrap_admin(
        &self,
        email: &str,
        password: Option<String>,
    ) -> Result<Option<BootstrapAdmin>, ServiceError> {
        if self.repo.count_users().await? > 0 {
            return Ok(None);
        }

        let email = validate_email(email)?;
        let (password, generated) = match password {
            Some(password) => {
                validate_password(&password)?;
                (password, false)
            }
            None => (generate_token(12), true),
        };

        self.repo
            .create_user(&NewUser {
                name: "Administrator".to_string(),
                email: email.clone(),
                password_hash: hash_password(password.clone()).await?,
                role: UserRole::Admin,
            })
            .await?;
        tracing::info!(%email, "Created initial administrator");
        Ok(Some(BootstrapAdmin {
            email,
            generated_password: generated.then_some(password),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::DEACTIVATED_USER_PREFIX;
    use crate::data::SqliteService;
    use crate::domain::testing::Fixture;

    fn input(name: &str, email: &str) -> NewUserInput {
        NewUserInput {
            name: name.to_string(),
            email: email.to_string(),
            password: "correct horse".to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_authenticate() {
        let fx = Fixture::new().await;
        let admin = fx.admin("root").await;
        let users = &fx.services.users;

        let user = users
            .create_user(&admin, input("Carol", " Carol@Example.com "))
            .await
            .unwrap();
        assert_eq!(user.email, "carol@example.com");
        assert_eq!(user.role, UserRole::Member);

        let authed = users
            .authenticate("CAROL@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(authed.id, user.id);

        for (email, password) in [
            ("carol@example.com", "wrong password"),
            ("nobody@example.com", "correct horse"),
        ] {
            let err = users.authenticate(email, password).await.unwrap_err();
            assert!(matches!(err, ServiceError::Unauthorized(ref m) if m == INVALID_CREDENTIALS));
        }
    }

    #[tokio::test]
    async fn test_deactivated_account_rejected_like_unknown_email() {
        let fx = Fixture::new().await;
        let admin = fx.admin("root").await;
        let users = &fx.services.users;

        let user = users
            .create_user(&admin, input("Dana", "dana@example.com"))
            .await
            .unwrap();
        users.deactivate_user(&admin, &user.id).await.unwrap();

        let inactive = users
            .authenticate("dana@example.com", "correct horse")
            .await
            .unwrap_err();
        let unknown = users
            .authenticate("nobody@example.com", "correct horse")
            .await
            .unwrap_err();
        assert_eq!(inactive.to_string(), unknown.to_string());
        assert!(matches!(unknown, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_create_requires_admin_and_unique_email() {
        let fx = Fixture::new().await;
        let admin = fx.admin("root").await;
        let users = &fx.services.users;

        let err = users
            .create_user(&fx.owner, input("Carol", "carol@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));

        users
            .create_user(&admin, input("Carol", "carol@example.com"))
            .await
            .unwrap();
        let err = users
            .create_user(&admin, input("Other", "CAROL@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let mut short = input("Dave", "dave@example.com");
        short.password = "short".into();
        assert!(matches!(
            users.create_user(&admin, short).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            users.create_user(&admin, input("Erin", "not-an-email")).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_rules() {
        let fx = Fixture::new().await;
        let admin = fx.admin("root").await;
        let other = fx.user("other").await;
        let users = &fx.services.users;

        let renamed = users
            .update_user(
                &fx.owner,
                &fx.owner.user_id,
                UserPatch {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Renamed");

        let err = users
            .update_user(&fx.owner, &other.user_id, UserPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));

        let promote = UserPatch {
            role: Some(UserRole::Admin),
            ..Default::default()
        };
        let err = users
            .update_user(&fx.owner, &fx.owner.user_id, promote.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));

        let promoted = users
            .update_user(&admin, &other.user_id, promote)
            .await
            .unwrap();
        assert_eq!(promoted.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_deactivate() {
        let fx = Fixture::new().await;
        let admin = fx.admin("root").await;
        let users = &fx.services.users;

        let err = users
            .deactivate_user(&admin, &admin.user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let gone = users
            .deactivate_user(&admin, &fx.owner.user_id)
            .await
            .unwrap();
        assert!(!gone.is_active);
        assert_eq!(gone.name, format!("{} (Owner)", DEACTIVATED_USER_PREFIX));

        let listed = users.list_users().await.unwrap();
        assert!(listed.iter().all(|u| u.id != fx.owner.user_id));

        let err = users.principal_for(&fx.owner.user_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_bootstrap_only_on_empty_store() {
        let db = SqliteService::in_memory().await;
        let services = crate::domain::Services::new(Arc::new(db));
        let users = &services.users;

        let created = users
            .bootstrap_admin("Admin@Example.com", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.email, "admin@example.com");
        let password = created.generated_password.unwrap();

        let admin = users.authenticate("admin@example.com", &password).await.unwrap();
        assert_eq!(admin.role, UserRole::Admin);

        assert!(
            users
                .bootstrap_admin("second@example.com", Some("password123".into()))
                .await
                .unwrap()
                .is_none()
        );
    }
}
