//! User management service

use serde::Deserialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::models::UserView;

/// User service for the user CRUD surface
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// Input for creating a user through the CRUD surface
///
/// Accounts created here carry no password credential until one is set
/// through the auth flow; they cannot log in. An omitted `email` defaults
/// to empty on create and leaves the stored value untouched on update.
#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub username: String,
    pub email: Option<String>,
}

/// Input for partially updating a user
#[derive(Debug, Deserialize)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all users
    pub async fn list(&self) -> AppResult<Vec<UserView>> {
        let users = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, username, email FROM users ORDER BY id ASC",
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|(id, username, email)| UserView {
            id,
            username,
            email,
        })
        .collect();

        Ok(users)
    }

    /// Get a user by ID
    pub async fn get(&self, user_id: i64) -> AppResult<UserView> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, username, email FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(UserView {
            id: row.0,
            username: row.1,
            email: row.2,
        })
    }

    /// Create a user
    pub async fn create(&self, input: CreateUserInput) -> AppResult<UserView> {
        if input.username.trim().is_empty() {
            return Err(AppError::Validation {
                field: "username".to_string(),
                message: "Username cannot be empty".to_string(),
            });
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE LOWER(username) = LOWER($1)",
        )
        .bind(&input.username)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Validation {
                field: "username".to_string(),
                message: "A user with that username already exists.".to_string(),
            });
        }

        let row = sqlx::query_as::<_, (i64, String, String)>(
            r#"
            INSERT INTO users (username, email)
            VALUES ($1, $2)
            RETURNING id, username, email
            "#,
        )
        .bind(&input.username)
        .bind(input.email.as_deref().unwrap_or(""))
        .fetch_one(&self.db)
        .await?;

        Ok(UserView {
            id: row.0,
            username: row.1,
            email: row.2,
        })
    }

    /// Fully update a user
    pub async fn update(&self, user_id: i64, input: CreateUserInput) -> AppResult<UserView> {
        self.apply_update(
            user_id,
            UpdateUserInput {
                username: Some(input.username),
                email: input.email,
            },
        )
        .await
    }

    /// Partially update a user
    pub async fn patch(&self, user_id: i64, input: UpdateUserInput) -> AppResult<UserView> {
        self.apply_update(user_id, input).await
    }

    async fn apply_update(&self, user_id: i64, input: UpdateUserInput) -> AppResult<UserView> {
        let existing = self.get(user_id).await?;

        let username = input.username.unwrap_or(existing.username);
        let email = input.email.unwrap_or(existing.email);

        if username.trim().is_empty() {
            return Err(AppError::Validation {
                field: "username".to_string(),
                message: "Username cannot be empty".to_string(),
            });
        }

        let duplicate = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE LOWER(username) = LOWER($1) AND id != $2",
        )
        .bind(&username)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        if duplicate > 0 {
            return Err(AppError::Validation {
                field: "username".to_string(),
                message: "A user with that username already exists.".to_string(),
            });
        }

        sqlx::query("UPDATE users SET username = $1, email = $2 WHERE id = $3")
            .bind(&username)
            .bind(&email)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        self.get(user_id).await
    }

    /// Delete a user
    ///
    /// Stock movements the user created survive with `created_by` cleared.
    pub async fn delete(&self, user_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        Ok(())
    }

    /// Count all users (dashboard stats)
    pub async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;

        Ok(count)
    }
}
