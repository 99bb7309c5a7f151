//! Authentication and user management service
//!
//! Identity is threaded explicitly: authentication yields a JWT whose claims
//! are passed into every operation. There is no session file and no global
//! logged-in state.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::{AuthConfig, BootstrapConfig},
    error::{AppError, AppResult},
    models::user::{Signup, UpdateProfile, User, UserClaims, UserRole},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by email and password, returning a JWT and the user
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Register a new member account
    pub async fn signup(&self, signup: Signup) -> AppResult<User> {
        signup
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.users.email_exists(&signup.email, None).await? {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let password_hash = self.hash_password(&signup.password)?;
        self.repository
            .users
            .create(&signup, &password_hash, UserRole::Member)
            .await
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List all users
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Update the caller's own profile (name, email, optionally password)
    pub async fn update_profile(&self, user_id: i32, profile: UpdateProfile) -> AppResult<User> {
        profile
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let user = self.repository.users.get_by_id(user_id).await?;

        if self
            .repository
            .users
            .email_exists(&profile.email, Some(user_id))
            .await?
        {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        // Changing the password requires proving knowledge of the current one
        let password_hash = if let Some(ref new_password) = profile.new_password {
            let current = profile.current_password.as_deref().ok_or_else(|| {
                AppError::Validation("Current password required to change password".to_string())
            })?;
            if !self.verify_password(&user, current)? {
                return Err(AppError::Authentication(
                    "Current password is incorrect".to_string(),
                ));
            }
            Some(self.hash_password(new_password)?)
        } else {
            None
        };

        self.repository
            .users
            .update_profile(user_id, &profile, password_hash)
            .await
    }

    /// Delete a user; fails with `HasOpenLoans` while they hold any book
    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.repository.users.delete(id).await
    }

    /// Create the default admin account when none exists yet
    pub async fn ensure_default_admin(&self, bootstrap: &BootstrapConfig) -> AppResult<()> {
        if self.repository.users.admin_exists().await? {
            return Ok(());
        }

        let signup = Signup {
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            email: bootstrap.admin_email.clone(),
            password: bootstrap.admin_password.clone(),
        };
        let password_hash = self.hash_password(&signup.password)?;
        self.repository
            .users
            .create(&signup, &password_hash, UserRole::Admin)
            .await?;

        tracing::warn!(
            "No admin account found; created default admin {} - change its password",
            bootstrap.admin_email
        );
        Ok(())
    }

    /// Create JWT token for a user
    pub fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.user_id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
