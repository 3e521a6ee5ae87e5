//! Local account records backing the email/password auth provider.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Account {
    pub uid: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
}
