use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    helpers::{format_datetime, parse_datetime},
    models::Account,
    Database,
};

fn row_to_account(row: &Row) -> Result<Account> {
    let created_at: String = row.get("created_at")?;

    Ok(Account {
        uid: row.get("uid")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        salt: row.get("salt")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Returns `false` without inserting when the email is already taken.
    pub async fn insert_account(&self, account: &Account) -> Result<bool> {
        let record = account.clone();
        self.execute(move |conn| {
            let rows = conn
                .execute(
                    "INSERT OR IGNORE INTO accounts (uid, email, password_hash, salt, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        record.uid,
                        record.email,
                        record.password_hash,
                        record.salt,
                        format_datetime(record.created_at),
                    ],
                )
                .with_context(|| "failed to insert account")?;
            Ok(rows == 1)
        })
        .await
    }

    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let email = email.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT uid, email, password_hash, salt, created_at
                 FROM accounts
                 WHERE email = ?1",
            )?;

            let row = stmt
                .query_row(params![email], |row| Ok(row_to_account(row)))
                .optional()?;
            row.transpose()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("accounts.sqlite3")).unwrap();

        let account = Account {
            uid: "u1".into(),
            email: "Volunteer@example.com".into(),
            password_hash: "h".into(),
            salt: "s".into(),
            created_at: Utc::now(),
        };
        assert!(db.insert_account(&account).await.unwrap());

        let dup = Account {
            uid: "u2".into(),
            email: "volunteer@example.com".into(),
            ..account.clone()
        };
        assert!(!db.insert_account(&dup).await.unwrap());

        let found = db
            .find_account_by_email("VOLUNTEER@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.uid, "u1");
        assert!(db.find_account_by_email("x@y.z").await.unwrap().is_none());
    }
}
