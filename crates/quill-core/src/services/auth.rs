//! Credential store: signup, login and token issuance.

use std::sync::Arc;

use crate::DomainError;
use crate::domain::User;
use crate::error::RepoError;
use crate::ports::{PasswordService, TokenService, UserRepository};

use super::required_trimmed;

/// Signup input. Every field is optional so missing ones surface as validation errors.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login input.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new user. The password is hashed before it reaches storage.
    pub async fn register(&self, input: NewUser) -> Result<User, DomainError> {
        let username = required_trimmed(input.username, "Username is required")?;
        let email = required_trimmed(input.email, "Email is required")?.to_lowercase();
        if !email.contains('@') {
            return Err(DomainError::Validation(
                "Please provide a valid email".to_string(),
            ));
        }
        let password = match input.password {
            Some(p) if !p.is_empty() => p,
            _ => return Err(DomainError::Validation("Password is required".to_string())),
        };

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::DuplicateEmail);
        }
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::DuplicateUsername);
        }

        let password_hash = self
            .passwords
            .hash(&password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = self
            .users
            .insert(User::new(username, email, password_hash))
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent signup
                RepoError::Constraint(_) => DomainError::DuplicateEmail,
                other => DomainError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and issue a token.
    pub async fn authenticate(
        &self,
        credentials: Credentials,
    ) -> Result<(User, String), DomainError> {
        let (Some(email), Some(password)) = (credentials.email, credentials.password) else {
            return Err(DomainError::InvalidCredentials);
        };

        let user = self
            .users
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = self
            .passwords
            .verify(&password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Sign a bearer token carrying the user's id and username.
    pub fn issue_token(&self, user: &User) -> Result<String, DomainError> {
        self.tokens
            .generate_token(user.id, &user.username)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}
