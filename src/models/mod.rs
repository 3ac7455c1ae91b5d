mod entry;
mod user;
mod forms;

pub use entry::{parse_amount, Entry};
pub use user::User;
pub use forms::{LoginForm, RegisterForm, EntryForm, EntryFilter};
