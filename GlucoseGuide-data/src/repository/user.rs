use rusqlite::OptionalExtension;
use tracing::info;

use crate::database::DatabasePool;
use crate::models::user::{DiabetesType, NewUser, UserRow};
use super::errors::RepositoryError;

/// Repository for users.
///
/// Users are created out of band; the HTTP API never writes them.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: DatabasePool,
}

impl UserRepository {
    /// Create a repository over an open pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Insert a user; fails when the email is already taken
    pub async fn create(&self, user: NewUser) -> Result<UserRow, RepositoryError> {
        self.pool
            .run_in_transaction("create_user", move |tx| {
                tx.execute(
                    "INSERT INTO users (email, diabetes_type) VALUES (?1, ?2)",
                    (&user.email, user.diabetes_type.as_str()),
                )?;
                let id = tx.last_insert_rowid();
                info!("Created user {}", id);

                Ok(UserRow {
                    id,
                    email: user.email,
                    diabetes_type: user.diabetes_type,
                })
            })
            .await
    }

    /// Get a user by id
    pub async fn get_by_id(&self, id: i64) -> Result<Option<UserRow>, RepositoryError> {
        self.pool
            .run_in_transaction("get_user", move |tx| {
                let row = tx
                    .query_row(
                        "SELECT id, email, diabetes_type FROM users WHERE id = ?1",
                        [id],
                        |row| {
                            Ok((
                                row.get::<_, i64>(0)?,
                                row.get::<_, String>(1)?,
                                row.get::<_, String>(2)?,
                            ))
                        },
                    )
                    .optional()?;

                row.map(|(id, email, diabetes_type)| -> Result<UserRow, RepositoryError> {
                    let diabetes_type = diabetes_type
                        .parse::<DiabetesType>()
                        .map_err(RepositoryError::InvalidData)?;
                    Ok(UserRow { id, email, diabetes_type })
                })
                .transpose()
            })
            .await
    }
}
