//! User Storage
//! Mission: Persist staff accounts and apply profile updates with SQLite

use crate::auth::models::{ProfileUpdate, User, UserRole};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Persistence collaborator used by the handlers
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Apply `update` to the user currently registered as `current_email`.
    ///
    /// Returns `false` when no such user exists or the new email is taken.
    async fn update_user_profile(&self, current_email: &str, update: &ProfileUpdate)
        -> Result<bool>;

    async fn create_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        role: UserRole,
    ) -> Result<User>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// User storage with SQLite backend
#[derive(Clone)]
pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    /// Open (or create) the database at `db_path` and initialize the schema
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).context("open user db")?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory user db")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL COLLATE NOCASE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("create users table")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let role: String = row.get(4)?;
    Ok(User {
        id: Uuid::parse_str(&id).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        role: UserRole::parse(&role).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                format!("unknown role '{role}'").into(),
            )
        })?,
        created_at: row.get(5)?,
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn update_user_profile(
        &self,
        current_email: &str,
        update: &ProfileUpdate,
    ) -> Result<bool> {
        let conn = self.conn.lock().await;

        let result = conn.execute(
            "UPDATE users SET first_name = ?1, last_name = ?2, email = ?3 WHERE email = ?4",
            params![
                update.first_name,
                update.last_name,
                update.email,
                current_email
            ],
        );

        match result {
            Ok(0) => {
                warn!(current_email, "Profile update matched no user");
                Ok(false)
            }
            Ok(_) => {
                info!(current_email, new_email = %update.email, "Updated user profile");
                Ok(true)
            }
            Err(e) if is_constraint_violation(&e) => {
                warn!(new_email = %update.email, "Profile update rejected: email already in use");
                Ok(false)
            }
            Err(e) => Err(e).context("update user profile"),
        }
    }

    async fn create_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        role: UserRole,
    ) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.trim().to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            role,
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO users (id, email, first_name, last_name, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id.to_string(),
                user.email,
                user.first_name,
                user.last_name,
                user.role.as_str(),
                user.created_at,
            ],
        )
        .with_context(|| format!("insert user {}", user.email))?;

        info!(email = %user.email, role = %user.role, "Created user");

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached(
            "SELECT id, email, first_name, last_name, role, created_at
             FROM users WHERE email = ?1",
        )?;

        let user = stmt
            .query_row(params![email], row_to_user)
            .optional()
            .context("load user by email")?;

        Ok(user)
    }
}
