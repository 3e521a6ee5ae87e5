//! Who is signed in, and whether they may triage reports.
//!
//! The admin check is a placeholder access check, not a security boundary:
//! it decides which commands a presentation surface may invoke and nothing
//! more.

mod admin;
mod gate;
mod listener;
mod local;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use admin::{AdminPolicy, AllowListAdminPolicy, DEFAULT_ADMIN_EMAIL};
pub use gate::{SessionGate, SessionIdentity};
pub use listener::spawn_identity_listener;
pub use local::LocalAuthProvider;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("email address is malformed")]
    InvalidEmail,
    #[error("password must be at least {min_len} characters")]
    WeakPassword { min_len: usize },
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("wrong email or password")]
    InvalidCredentials,
    #[error("authentication service unavailable: {0}")]
    Unavailable(String),
}

/// Email/password identity provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<Principal, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}
