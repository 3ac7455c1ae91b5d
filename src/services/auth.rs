use bcrypt::{hash, verify};
use crate::errors::{AppError, AppResult};
use crate::models::{RegisterForm, User};
use crate::services::RecordStore;

/// Credential checks and registration over the users table.
pub struct AuthService<'a> {
    store: &'a dyn RecordStore,
    bcrypt_cost: u32,
}

impl<'a> AuthService<'a> {
    pub fn new(store: &'a dyn RecordStore, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    /// True when a row with exactly this username holds a matching password.
    /// A missing user is `Ok(false)`; only storage faults are errors.
    pub fn validate(&self, username: &str, password: &str) -> AppResult<bool> {
        for user in self.store.read_users()? {
            if user.username == username && password_matches(&user, password) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn username_exists(&self, username: &str) -> AppResult<bool> {
        Ok(self.store.read_users()?.iter().any(|u| u.username == username))
    }

    /// Usernames are trimmed before the duplicate check and stored trimmed.
    pub fn register(&self, form: RegisterForm) -> AppResult<User> {
        let username = form.username.trim();
        if username.is_empty() {
            return Err(AppError::Validation("Username is required".into()));
        }
        if form.password.is_empty() {
            return Err(AppError::Validation("Password is required".into()));
        }
        if self.username_exists(username)? {
            return Err(AppError::Validation("Username already exists".into()));
        }

        let password = hash(form.password.as_bytes(), self.bcrypt_cost).map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            AppError::Validation("Registration failed".into())
        })?;
        let user = User {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            username: username.to_string(),
            password,
        };

        self.store.append_user(&user)?;
        tracing::info!("Registered user: {}", user.username);
        Ok(user)
    }
}

fn password_matches(user: &User, password: &str) -> bool {
    if is_bcrypt_hash(&user.password) {
        match verify(password, &user.password) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!("Unreadable password hash for {}: {}", user.username, e);
                false
            }
        }
    } else {
        // Clear-text row written by an older install
        tracing::warn!("User {} has a clear-text password on file", user.username);
        user.password == password
    }
}

fn is_bcrypt_hash(stored: &str) -> bool {
    stored.len() == 60 && ["$2a$", "$2b$", "$2x$", "$2y$"].iter().any(|p| stored.starts_with(p))
}
