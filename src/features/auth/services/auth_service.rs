use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, RegisterRequestDto};
use crate::features::auth::models::User;
use crate::features::auth::services::TokenService;

/// Single message for both unknown-email and wrong-password failures so the
/// response does not reveal which half was wrong.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Service for authentication operations (register, login)
pub struct AuthService {
    pool: PgPool,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, token_service: Arc<TokenService>) -> Self {
        Self {
            pool,
            token_service,
        }
    }

    /// Register a new user: reject duplicate emails, hash the password,
    /// insert with the default role, and issue a token.
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(&dto.email)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, display_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, role, display_name, created_at
            "#,
        )
        .bind(&dto.email)
        .bind(&password_hash)
        .bind(&dto.display_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            // Lost the pre-check race: another request inserted the email first
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("User already exists".to_string())
            }
            e => {
                tracing::error!("Failed to insert user: {:?}", e);
                AppError::Database(e)
            }
        })?;

        tracing::info!("Registered user: {}", user.id);

        let token = self.token_service.issue(&user)?;
        Ok(AuthResponseDto::new(token, user))
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, display_name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(&dto.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        verify_password(&dto.password, &user.password_hash)?;

        let token = self.token_service.issue(&user)?;
        Ok(AuthResponseDto::new(token, user))
    }
}

/// Derive a salted argon2 PHC-string hash for storage.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Compare a candidate password against a stored hash. A mismatch yields
/// the same generic message as an unknown email.
fn verify_password(password: &str, stored_hash: &str) -> Result<()> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
}
