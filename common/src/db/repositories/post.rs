// Post repository implementation

use crate::db::{DbPool, Session};
use crate::errors::DatabaseError;
use crate::models::{NewPost, Post};
use tracing::instrument;

/// Repository for post-related database operations
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: DbPool,
}

impl PostRepository {
    /// Create a new PostRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a post and return the stored row with its generated id
    ///
    /// The owning user is not looked up first. A dangling `user_id` is only
    /// rejected when the store enforces foreign keys.
    #[instrument(skip(self, post), fields(user_id = post.user_id))]
    pub async fn create(&self, post: &NewPost) -> Result<Post, DatabaseError> {
        let mut session = self.pool.session().await?;

        let created = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content, user_id)
            VALUES (?, ?, ?)
            RETURNING id, title, content, user_id
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.user_id)
        .fetch_one(&mut *session)
        .await?;

        session.commit().await?;

        tracing::info!(post_id = created.id, user_id = created.user_id, "Post created");
        Ok(created)
    }

    /// Find all posts
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Post>, DatabaseError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, user_id
            FROM posts
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.pool())
        .await?;

        Ok(posts)
    }

    /// Find every post owned by a user
    #[instrument(skip(self))]
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<Post>, DatabaseError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, user_id
            FROM posts
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(posts)
    }

    /// Find a post by ID
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, user_id
            FROM posts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(post)
    }

    /// Replace a post's content, leaving `title` and `user_id` untouched
    ///
    /// Returns `None` when no post has this id.
    #[instrument(skip(self, content))]
    pub async fn update_content(
        &self,
        id: i64,
        content: &str,
    ) -> Result<Option<Post>, DatabaseError> {
        let mut session = self.pool.session().await?;

        let updated = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET content = ?
            WHERE id = ?
            RETURNING id, title, content, user_id
            "#,
        )
        .bind(content)
        .bind(id)
        .fetch_optional(&mut *session)
        .await?;

        if updated.is_some() {
            session.commit().await?;
            tracing::info!(post_id = id, "Post content updated");
        }

        Ok(updated)
    }

    /// Delete a post
    ///
    /// Returns `false` when no post has this id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut session = self.pool.session().await?;

        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&mut *session)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        session.commit().await?;

        tracing::info!(post_id = id, "Post deleted");
        Ok(true)
    }

    /// Delete every post owned by a user inside an open session
    ///
    /// The caller commits. Returns the number of rows removed.
    #[instrument(skip(session))]
    pub async fn delete_by_user(session: &mut Session, user_id: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM posts WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut **session)
            .await?;

        Ok(result.rows_affected())
    }
}
