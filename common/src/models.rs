// Core data models for users and posts

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User represents one row of the `users` table
///
/// `username` and `password` never change after creation; `email` is the
/// only field the API lets callers update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Stored and returned as given; no hashing is applied.
    pub password: String,
}

/// Fields required to insert a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Post represents one row of the `posts` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Owning user. Not checked by the application on insert.
    pub user_id: i64,
}

/// Fields required to insert a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub user_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_all_columns() {
        let user = User {
            id: 7,
            username: "a".to_string(),
            email: "a@x.com".to_string(),
            password: "p".to_string(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": 7, "username": "a", "email": "a@x.com", "password": "p"})
        );
    }

    #[test]
    fn test_new_post_requires_integer_user_id() {
        let result = serde_json::from_str::<NewPost>(
            r#"{"title": "t", "content": "c", "user_id": "one"}"#,
        );
        assert!(result.is_err());
    }
}
