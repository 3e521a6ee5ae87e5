use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::{AuthError, AuthProvider, Principal};
use crate::db::{Account, Database};

const MIN_PASSWORD_LEN: usize = 6;

/// Accounts kept in the local SQLite file with salted SHA-256 hashes.
#[derive(Clone)]
pub struct LocalAuthProvider {
    db: Database,
}

impl LocalAuthProvider {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email.to_string()),
        _ => Err(AuthError::InvalidEmail),
    }
}

fn unavailable(err: anyhow::Error) -> AuthError {
    AuthError::Unavailable(format!("{err:#}"))
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let email = normalize_email(email)?;
        let account = self
            .db
            .find_account_by_email(&email)
            .await
            .map_err(unavailable)?
            .ok_or(AuthError::InvalidCredentials)?;

        if hash_password(&account.salt, password) != account.password_hash {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Principal {
            uid: account.uid,
            email: account.email,
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min_len: MIN_PASSWORD_LEN,
            });
        }

        let salt = hex::encode(rand::random::<[u8; 16]>());
        let account = Account {
            uid: Uuid::new_v4().to_string(),
            email,
            password_hash: hash_password(&salt, password),
            salt,
            created_at: Utc::now(),
        };

        if !self.db.insert_account(&account).await.map_err(unavailable)? {
            return Err(AuthError::EmailTaken);
        }

        Ok(Principal {
            uid: account.uid,
            email: account.email,
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }
}
