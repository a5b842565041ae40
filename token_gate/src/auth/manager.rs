//! Authentication manager implementation.

use super::{
    errors::{AuthError, AuthResult},
    models::{CredentialPair, LoginRequest, RegisterRequest, User},
    repository::UserRepository,
    signer::CredentialIssuer,
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use log::info;
use std::sync::Arc;

/// Maximum length of a display name
const MAX_NAME_LEN: usize = 64;

/// Authentication manager
#[derive(Clone)]
pub struct AuthManager {
    users: Arc<dyn UserRepository>,
    issuer: Arc<CredentialIssuer>,
    pepper: String,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `users` - User storage
    /// * `issuer` - Credential issuer shared with the token guard
    /// * `pepper` - Server-side pepper for password hashing
    pub fn new(
        users: Arc<dyn UserRepository>,
        issuer: Arc<CredentialIssuer>,
        pepper: String,
    ) -> Self {
        Self {
            users,
            issuer,
            pepper,
        }
    }

    /// Register a new user
    ///
    /// # Errors
    ///
    /// * `AuthError::EmailTaken` - Email already exists
    /// * `AuthError::InvalidName` - Name empty or too long
    /// * `AuthError::InvalidEmail` - Email format invalid
    /// * `AuthError::WeakPassword` - Password too weak
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        self.validate_name(&request.name)?;
        self.validate_email(&request.email)?;
        self.validate_password(&request.password)?;

        // Cheap pre-check; the repository re-checks under its write lock
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.hash_password(&request.password)?;
        let user = self
            .users
            .create_user(request.name.trim(), &request.email, &password_hash)
            .await?;

        info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Login a user and issue a credential pair
    ///
    /// # Errors
    ///
    /// * `AuthError::UserNotFound` - No account for the email
    /// * `AuthError::InvalidPassword` - Incorrect password
    pub async fn login(&self, request: LoginRequest) -> AuthResult<(User, CredentialPair)> {
        let record = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.verify_password(&request.password, &record.password_hash)?;

        let tokens = self.issuer.issue(&record.user.id)?;
        Ok((record.user, tokens))
    }

    /// Hash password with Argon2id + pepper
    fn hash_password(&self, password: &str) -> AuthResult<String> {
        let peppered = format!("{}{}", password, self.pepper);
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        Ok(argon2
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Verify password against hash
    fn verify_password(&self, password: &str, hash: &str) -> AuthResult<()> {
        let peppered = format!("{}{}", password, self.pepper);
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidPassword)?;
        let argon2 = Argon2::default();

        argon2
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidPassword)
    }

    fn validate_name(&self, name: &str) -> AuthResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidName("Name must not be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AuthError::InvalidName(format!(
                "Name must be at most {MAX_NAME_LEN} characters"
            )));
        }
        Ok(())
    }

    fn validate_email(&self, email: &str) -> AuthResult<()> {
        let email = email.trim();
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !email.chars().any(char::is_whitespace)
            }
            None => false,
        };

        if !valid {
            return Err(AuthError::InvalidEmail(
                "Email must look like name@domain".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate password strength
    fn validate_password(&self, password: &str) -> AuthResult<()> {
        if password.len() < 8 {
            return Err(AuthError::WeakPassword(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
        let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());

        if !has_digit || !has_uppercase || !has_lowercase {
            return Err(AuthError::WeakPassword(
                "Password must contain at least one number, one uppercase and one lowercase letter"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
