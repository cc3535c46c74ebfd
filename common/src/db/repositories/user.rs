// User repository implementation

use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{NewUser, User};
use tracing::instrument;

use super::post::PostRepository;

/// Repository for user-related database operations
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a user and return the stored row with its generated id
    ///
    /// A username or email that is already taken fails with
    /// `DatabaseError::DuplicateKey`.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn create(&self, user: &NewUser) -> Result<User, DatabaseError> {
        let mut session = self.pool.session().await?;

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password)
            VALUES (?, ?, ?)
            RETURNING id, username, email, password
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&mut *session)
        .await?;

        session.commit().await?;

        tracing::info!(user_id = created.id, username = %created.username, "User created");
        Ok(created)
    }

    /// Find all users
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.pool())
        .await?;

        Ok(users)
    }

    /// Find a user by ID
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(user)
    }

    /// Replace a user's email
    ///
    /// Returns `None` when no user has this id.
    #[instrument(skip(self, email))]
    pub async fn update_email(&self, id: i64, email: &str) -> Result<Option<User>, DatabaseError> {
        let mut session = self.pool.session().await?;

        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = ?
            WHERE id = ?
            RETURNING id, username, email, password
            "#,
        )
        .bind(email)
        .bind(id)
        .fetch_optional(&mut *session)
        .await?;

        if updated.is_some() {
            session.commit().await?;
            tracing::info!(user_id = id, "User email updated");
        }

        Ok(updated)
    }

    /// Delete a user together with every post they own
    ///
    /// Both deletes share one session and commit once. Returns the number
    /// of posts removed, or `None` when no user has this id.
    #[instrument(skip(self))]
    pub async fn delete_with_posts(&self, id: i64) -> Result<Option<u64>, DatabaseError> {
        let mut session = self.pool.session().await?;

        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *session)
            .await?;

        if exists.is_none() {
            return Ok(None);
        }

        let posts_deleted = PostRepository::delete_by_user(&mut session, id).await?;

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *session)
            .await?;

        session.commit().await?;

        tracing::info!(user_id = id, posts_deleted, "User and posts deleted");
        Ok(Some(posts_deleted))
    }
}
