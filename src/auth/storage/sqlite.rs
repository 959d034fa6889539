//! SQLite-backed user store.
//!
//! The UNIQUE(email, auth_type) constraint closes the race between an
//! existence check and a create; a violation surfaces as `Conflict`.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::auth::errors::AuthError;
use crate::auth::types::{Credential, Provenance, User};

use super::r#trait::UserStore;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `database_url` and run the
    /// embedded migration.
    pub async fn connect(database_url: &str) -> Result<Self, AuthError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AuthError::Internal(format!("invalid database URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AuthError::Internal(format!("database connection failed: {e}")))?;

        let store = Self { pool };
        store.migrate().await?;
        info!(database_url, "user database ready");
        Ok(store)
    }

    /// Private in-memory database, one connection so all queries see the
    /// same instance. Test helper.
    pub async fn in_memory() -> Result<Self, AuthError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| AuthError::Internal(format!("database connection failed: {e}")))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), AuthError> {
        sqlx::query(include_str!("../../../migrations/001_create_users_table.sql"))
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Internal(format!("migration failed: {e}")))?;
        Ok(())
    }
}

type UserRow = (
    String,         // id
    String,         // email
    String,         // name
    String,         // avatar
    Option<String>, // password_hash
    Option<String>, // external_id
    String,         // auth_type
    String,         // created_at
);

fn row_to_user(row: UserRow) -> Result<User, AuthError> {
    let (id, email, name, avatar, password_hash, external_id, auth_type, created_at) = row;

    let credential = match Provenance::parse(&auth_type) {
        Some(Provenance::Local) => Credential::Local {
            password_hash: password_hash
                .ok_or_else(|| AuthError::Internal("local user row missing password hash".into()))?,
        },
        Some(Provenance::Federated) => Credential::Federated {
            external_id: external_id
                .ok_or_else(|| AuthError::Internal("federated user row missing external id".into()))?,
        },
        None => {
            return Err(AuthError::Internal(format!(
                "unknown auth_type in users table: {auth_type}"
            )))
        }
    };

    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| AuthError::Internal(format!("bad created_at timestamp: {e}")))?
        .with_timezone(&chrono::Utc);

    Ok(User {
        id,
        email,
        name,
        avatar,
        created_at,
        credential,
    })
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn insert(&self, user: &User) -> Result<(), AuthError> {
        let (password_hash, external_id) = match &user.credential {
            Credential::Local { password_hash } => (Some(password_hash.as_str()), None),
            Credential::Federated { external_id } => (None, Some(external_id.as_str())),
        };

        let result = sqlx::query(
            "INSERT INTO users (id, email, name, avatar, password_hash, external_id, auth_type, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.avatar)
        .bind(password_hash)
        .bind(external_id)
        .bind(user.provenance().as_str())
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db))
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                Err(AuthError::Conflict("Email is already registered".to_string()))
            }
            Err(e) => Err(AuthError::Internal(format!("user insert failed: {e}"))),
        }
    }

    async fn find_by_email(
        &self,
        email: &str,
        provenance: Provenance,
    ) -> Result<Option<User>, AuthError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, name, avatar, password_hash, external_id, auth_type, created_at \
             FROM users WHERE email = ? AND auth_type = ?",
        )
        .bind(email)
        .bind(provenance.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Internal(format!("user lookup failed: {e}")))?;

        row.map(row_to_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::DEFAULT_AVATAR;

    fn user(email: &str, credential: Credential) -> User {
        User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: "Test".to_string(),
            avatar: DEFAULT_AVATAR.to_string(),
            created_at: chrono::Utc::now(),
            credential,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_roundtrip() {
        let store = SqliteStore::in_memory().await.unwrap();

        let local = user(
            "a@example.com",
            Credential::Local {
                password_hash: "$2b$04$hash".into(),
            },
        );
        store.insert(&local).await.unwrap();

        let found = store
            .find_by_email("a@example.com", Provenance::Local)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, local.id);
        assert_eq!(found.credential, local.credential);

        // Nothing under the other provenance.
        assert!(store
            .find_by_email("a@example.com", Provenance::Federated)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_unique_constraint_translates_to_conflict() {
        let store = SqliteStore::in_memory().await.unwrap();

        let first = user(
            "b@example.com",
            Credential::Federated {
                external_id: "g-1".into(),
            },
        );
        let second = user(
            "b@example.com",
            Credential::Federated {
                external_id: "g-2".into(),
            },
        );

        store.insert(&first).await.unwrap();
        assert!(matches!(
            store.insert(&second).await,
            Err(AuthError::Conflict(_))
        ));

        // The same email under the opposite provenance is allowed.
        let local = user(
            "b@example.com",
            Credential::Local {
                password_hash: "hash".into(),
            },
        );
        store.insert(&local).await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_creates_file_and_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");
        let url = format!("sqlite:{}", path.display());

        let store = SqliteStore::connect(&url).await.unwrap();
        let local = user(
            "c@example.com",
            Credential::Local {
                password_hash: "hash".into(),
            },
        );
        store.insert(&local).await.unwrap();
        assert!(path.exists());

        // A second connect migrates again harmlessly and sees the row.
        let reopened = SqliteStore::connect(&url).await.unwrap();
        let found = reopened
            .find_by_email("c@example.com", Provenance::Local)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, local.id);
    }
}
