mod auth;
mod ledger;

pub use auth::{serve_login_page, handle_login, serve_register_page, handle_register, handle_logout};
pub use ledger::{serve_index, serve_entries, add_entry};
