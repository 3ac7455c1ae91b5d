use axum::{
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    extract::Request,
};
use tower_sessions::Session;
use crate::errors::AppError;

/// Session key holding the logged-in username.
pub const SESSION_USER_KEY: &str = "username";

const PROTECTED_PATHS: [&str; 3] = ["/index", "/entries", "/add_entry"];

/// Who is making the current request. Inserted into the request extensions
/// by [`resolve_auth`] so handlers never read the session marker themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthContext {
    Anonymous,
    Authenticated(String),
}

impl AuthContext {
    pub fn username(&self) -> Option<&str> {
        match self {
            AuthContext::Authenticated(username) => Some(username),
            AuthContext::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.username().is_some()
    }

    /// Username for protected handlers; anonymous callers get sent to login.
    pub fn require_user(&self) -> Result<&str, AppError> {
        self.username()
            .ok_or_else(|| AppError::Auth("Not authenticated".into()))
    }
}

pub async fn resolve_auth(
    session: Session,
    mut req: Request,
    next: Next,
) -> Response {
    let context = match session.get::<String>(SESSION_USER_KEY).await {
        Ok(Some(username)) => AuthContext::Authenticated(username),
        Ok(None) => AuthContext::Anonymous,
        Err(e) => {
            tracing::error!("Failed to read session: {}", e);
            AuthContext::Anonymous
        }
    };

    let path = req.uri().path();
    if !context.is_authenticated() && PROTECTED_PATHS.contains(&path) {
        tracing::debug!("Anonymous request to {} redirected to login", path);
        return Redirect::to("/").into_response();
    }

    req.extensions_mut().insert(context);
    next.run(req).await
}
