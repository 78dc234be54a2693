//! Authentication service for signup, login, and token management
//!
//! Issues stateless HS256 token pairs. The access token carries the username
//! and email as claims so dashboard clients can render the account without a
//! second request; the refresh token is a longer-lived JWT marked with
//! `token_type = "refresh"`.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::models::User;
use shared::validation::{validate_email, validate_password};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// Input for creating an account at signup
#[derive(Debug, Deserialize)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub username: String,
    pub email: String,
    /// "access" or "refresh"
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

/// Access + refresh token pair
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Result of a successful signup
#[derive(Debug)]
pub struct SignupResult {
    pub user: User,
    pub tokens: TokenPair,
}

/// User row as stored, including the password hash
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    first_name: String,
    password_hash: String,
    is_staff: bool,
    is_superuser: bool,
    is_admin: bool,
    date_joined: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
            is_admin: row.is_admin,
            date_joined: row.date_joined,
        }
    }
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Create a new user account and issue a token pair
    ///
    /// The username is set to the email address. A user whose email or
    /// username already matches the requested email (case-insensitively) is
    /// rejected with a field-level validation error.
    pub async fn signup(&self, input: SignupInput) -> AppResult<SignupResult> {
        if let Err(msg) = validate_email(&input.email) {
            return Err(AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            });
        }

        if let Err(msg) = validate_password(&input.password) {
            return Err(AppError::Validation {
                field: "password".to_string(),
                message: msg.to_string(),
            });
        }

        // Username equals email at signup, so check both columns
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER($1) OR LOWER(username) = LOWER($1)",
        )
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Validation {
                field: "email".to_string(),
                message: "A user with that email already exists.".to_string(),
            });
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user: User = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, first_name, password_hash)
            VALUES ($1, $1, $2, $3)
            RETURNING id, username, email, first_name, password_hash,
                      is_staff, is_superuser, is_admin, date_joined
            "#,
        )
        .bind(&input.email)
        .bind(&input.name)
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await?
        .into();

        let tokens = self.generate_tokens(&user)?;

        Ok(SignupResult { user, tokens })
    }

    /// Authenticate with username or email plus password
    pub async fn login(&self, username: &str, password: &str) -> AppResult<TokenPair> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, first_name, password_hash,
                   is_staff, is_superuser, is_admin, date_joined
            FROM users
            WHERE username = $1 OR LOWER(email) = LOWER($1)
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        // Users created without a credential carry an empty hash; verify
        // fails for them the same as for a wrong password
        let valid = verify(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        self.generate_tokens(&user.into())
    }

    /// Exchange a refresh token for a new access token
    pub async fn refresh_access_token(&self, refresh_token: &str) -> AppResult<String> {
        let claims = decode::<Claims>(
            refresh_token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)?;

        if claims.token_type != "refresh" {
            return Err(AppError::InvalidToken);
        }

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::InvalidToken)?;

        // The account must still exist for the refresh to succeed
        let user: User = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, first_name, password_hash,
                   is_staff, is_superuser, is_admin, date_joined
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidToken)?
        .into();

        let now = Utc::now();
        self.encode_token(Self::build_claims(
            &user,
            "access",
            now,
            self.access_token_expiry,
        ))
    }

    /// Generate an access + refresh token pair for a user
    pub fn generate_tokens(&self, user: &User) -> AppResult<TokenPair> {
        let now = Utc::now();

        let access = self.encode_token(Self::build_claims(
            user,
            "access",
            now,
            self.access_token_expiry,
        ))?;
        let refresh = self.encode_token(Self::build_claims(
            user,
            "refresh",
            now,
            self.refresh_token_expiry,
        ))?;

        Ok(TokenPair { access, refresh })
    }

    /// Build the claim set for a token of the given type
    fn build_claims(
        user: &User,
        token_type: &str,
        now: DateTime<Utc>,
        expiry_seconds: i64,
    ) -> Claims {
        Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            token_type: token_type.to_string(),
            exp: (now + Duration::seconds(expiry_seconds)).timestamp(),
            iat: now.timestamp(),
        }
    }

    fn encode_token(&self, claims: Claims) -> AppResult<String> {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }
}
