use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
}

/// Raw add-entry submission. `amount` stays a string until the ledger
/// service parses it so a bad value can be reported on the page.
#[derive(Debug, Deserialize, Clone)]
pub struct EntryForm {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub entry_type: String,
    pub editor: String,
}

/// Query string of the entries page. Missing or empty values match everything.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct EntryFilter {
    pub month: Option<String>,
    pub entry_type: Option<String>,
    pub editor: Option<String>,
}

impl EntryFilter {
    pub fn month(&self) -> Option<&str> {
        non_empty(&self.month)
    }

    pub fn entry_type(&self) -> Option<&str> {
        non_empty(&self.entry_type)
    }

    pub fn editor(&self) -> Option<&str> {
        non_empty(&self.editor)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
