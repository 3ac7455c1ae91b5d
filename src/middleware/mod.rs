mod auth;

pub use auth::{resolve_auth, AuthContext, SESSION_USER_KEY};
