use crate::dto::auth_dto::TokenResponse;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::user::User;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;

const ALLOWED_ROLES: [&str; 3] = ["admin", "hr", "worker"];
const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, email: &str, password: &str, role: Option<String>) -> Result<User> {
        let role = role.unwrap_or_else(|| "worker".to_string());
        if !ALLOWED_ROLES.iter().any(|r| r.eq_ignore_ascii_case(&role)) {
            return Err(Error::BadRequest(format!("Unknown role: {}", role)));
        }

        let exists: Option<(uuid::Uuid,)> =
            sqlx::query_as(r#"SELECT id FROM users WHERE email = $1"#)
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        if exists.is_some() {
            return Err(Error::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(role.to_lowercase())
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE email = $1"#)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::Unauthorized("Invalid credentials".to_string()))?;

        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| Error::Internal(format!("Stored hash is invalid: {}", e)))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| Error::Unauthorized("Invalid credentials".to_string()))?;

        let exp = (chrono::Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            exp: exp as usize,
            role: Some(user.role.clone()),
        };

        let config = crate::config::get_config();
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Internal(format!("Token creation failed: {}", e)))?;

        Ok(TokenResponse {
            token,
            role: user.role,
        })
    }
}
