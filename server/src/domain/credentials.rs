//! Password hashing (argon2id, PHC strings with random salts)
//!
//! Hashing and verification are CPU-bound and run on the blocking pool.

use std::sync::LazyLock;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use super::ServiceError;
use crate::utils::crypto::generate_token;

/// Digest checked when no account matches, so a miss costs as much as a wrong password
static DECOY_DIGEST: LazyLock<Option<String>> =
    LazyLock::new(|| hash_blocking(&generate_token(16)).ok());

fn hash_blocking(plaintext: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

fn verify_blocking(plaintext: &str, digest: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

pub async fn hash_password(plaintext: String) -> Result<String, ServiceError> {
    tokio::task::spawn_blocking(move || hash_blocking(&plaintext))
        .await
        .map_err(|e| ServiceError::Internal(format!("password hashing task failed: {e}")))?
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))
}

/// False for a wrong password, an unparseable digest, or a missing digest
///
/// A missing digest is still paid for by checking [`DECOY_DIGEST`].
pub async fn verify_password(
    plaintext: String,
    digest: Option<String>,
) -> Result<bool, ServiceError> {
    tokio::task::spawn_blocking(move || match digest {
        Some(digest) => verify_blocking(&plaintext, &digest),
        None => {
            if let Some(decoy) = DECOY_DIGEST.as_deref() {
                verify_blocking(&plaintext, decoy);
            }
            false
        }
    })
    .await
    .map_err(|e| ServiceError::Internal(format!("password verification task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let digest = hash_password("correct horse".into()).await.unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(
            verify_password("correct horse".into(), Some(digest.clone()))
                .await
                .unwrap()
        );
        assert!(
            !verify_password("wrong horse".into(), Some(digest))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_salts_differ() {
        assert_ne!(
            hash_password("same".into()).await.unwrap(),
            hash_password("same".into()).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_malformed_digest_fails_closed() {
        assert!(
            !verify_password("anything".into(), Some("not-a-phc-string".into()))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_digest_checks_decoy() {
        assert!(!verify_password("anything".into(), None).await.unwrap());
        let decoy = DECOY_DIGEST.as_deref().unwrap();
        assert!(decoy.starts_with("$argon2id$"));
    }

    /// On a single-threaded runtime, other tasks keep running while a hash is computed
    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_does_not_block_runtime() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let ticker = tokio::spawn(async move {
            loop {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
            }
        });

        hash_password("correct horse".into()).await.unwrap();
        ticker.abort();
        assert!(ticks.load(Ordering::SeqCst) > 0);
    }
}
