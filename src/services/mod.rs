mod auth;
mod ledger;
mod store;

pub use auth::AuthService;
pub use ledger::{filter, totals, FilterOptions, LedgerService, Totals, DATE_FORMAT};
pub use store::{CsvStore, RecordStore};
