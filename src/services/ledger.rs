use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use crate::errors::{AppError, AppResult};
use crate::models::{parse_amount, Entry, EntryFilter, EntryForm};
use crate::services::RecordStore;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sums over an entry set. `net` is always `income - expense`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub net: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Distinct values offered by the filter drop-downs, sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub months: BTreeSet<String>,
    pub entry_types: BTreeSet<String>,
    pub editors: BTreeSet<String>,
}

impl FilterOptions {
    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut options = Self::default();
        for entry in entries {
            if let Some(month) = entry.month() {
                options.months.insert(month.to_string());
            }
            options.entry_types.insert(entry.entry_type.clone());
            options.editors.insert(entry.editor.clone());
        }
        options
    }
}

pub struct LedgerService<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> LedgerService<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    pub fn read_all(&self) -> AppResult<Vec<Entry>> {
        Ok(self.store.read_entries()?)
    }

    /// Validates the submission and appends it. Nothing is written on error,
    /// including when the new amount would push the ledger's totals out of range.
    pub fn append(&self, form: EntryForm) -> AppResult<Entry> {
        let entry = parse_entry(form)?;

        let mut entries = self.read_all()?;
        entries.push(entry.clone());
        if let Err(AppError::Overflow) = totals(&entries) {
            return Err(AppError::Validation("Amount is too large for this ledger".into()));
        }

        self.store.append_entry(&entry)?;
        tracing::info!(
            "Recorded {} entry of {} on {} by {}",
            entry.entry_type, entry.amount, entry.date, entry.editor
        );
        Ok(entry)
    }
}

fn parse_entry(form: EntryForm) -> AppResult<Entry> {
    let amount = parse_amount(&form.amount)
        .ok_or_else(|| AppError::Validation("Amount must be a number".into()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::Validation("Amount cannot be negative".into()));
    }

    let date = form.date.trim();
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| AppError::Validation("Date must be in YYYY-MM-DD format".into()))?;

    let entry_type = form.entry_type.trim();
    if entry_type.is_empty() {
        return Err(AppError::Validation("Entry type is required".into()));
    }
    let editor = form.editor.trim();
    if editor.is_empty() {
        return Err(AppError::Validation("Editor is required".into()));
    }

    Ok(Entry {
        date: date.to_string(),
        entry_type: entry_type.to_string(),
        description: form.description.trim().to_string(),
        amount,
        editor: editor.to_string(),
    })
}

/// Keeps entries matching every supplied criterion, in their original order.
/// An entry whose date has no month component never matches a month filter.
pub fn filter(entries: &[Entry], criteria: &EntryFilter) -> Vec<Entry> {
    entries
        .iter()
        .filter(|e| criteria.month().map_or(true, |m| e.month() == Some(m)))
        .filter(|e| criteria.entry_type().map_or(true, |t| e.entry_type == t))
        .filter(|e| criteria.editor().map_or(true, |ed| e.editor == ed))
        .cloned()
        .collect()
}

/// Splits the entry set into income and expense sums. Fails with
/// `AppError::Overflow` instead of panicking when a sum leaves Decimal's range.
pub fn totals(entries: &[Entry]) -> AppResult<Totals> {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for entry in entries {
        let sum = if entry.is_income() { &mut income } else { &mut expense };
        *sum = sum.checked_add(entry.amount).ok_or(AppError::Overflow)?;
    }
    let net = income.checked_sub(expense).ok_or(AppError::Overflow)?;
    Ok(Totals { net, income, expense })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{CsvStore, RecordStore};
    use std::str::FromStr;
    use tempfile::TempDir;

    fn entry(date: &str, entry_type: &str, amount: &str, editor: &str) -> Entry {
        Entry {
            date: date.into(),
            entry_type: entry_type.into(),
            description: String::new(),
            amount: Decimal::from_str(amount).unwrap(),
            editor: editor.into(),
        }
    }

    fn scenario() -> Vec<Entry> {
        vec![
            entry("2024-01-05", "income", "100", "alice"),
            entry("2024-01-06", "expense", "30", "bob"),
            entry("2024-02-01", "capital_credit", "50", "alice"),
        ]
    }

    fn form(date: &str, amount: &str) -> EntryForm {
        EntryForm {
            date: date.into(),
            description: "Groceries".into(),
            amount: amount.into(),
            entry_type: "expense".into(),
            editor: "alice".into(),
        }
    }

    fn month(m: &str) -> EntryFilter {
        EntryFilter { month: Some(m.into()), ..Default::default() }
    }

    #[test]
    fn test_totals_scenario() {
        let totals = totals(&scenario()).unwrap();
        assert_eq!(totals.net, Decimal::from(120));
        assert_eq!(totals.income, Decimal::from(150));
        assert_eq!(totals.expense, Decimal::from(30));
    }

    #[test]
    fn test_filtered_totals_scenario() {
        let january = filter(&scenario(), &month("01"));
        assert_eq!(january, scenario()[..2].to_vec());

        let totals = totals(&january).unwrap();
        assert_eq!(totals.income, Decimal::from(100));
        assert_eq!(totals.expense, Decimal::from(30));
        assert_eq!(totals.net, Decimal::from(70));
    }

    #[test]
    fn test_net_is_income_minus_expense() {
        let sets = vec![
            vec![],
            scenario(),
            vec![entry("2024-03-01", "expense", "0.10", "a"), entry("2024-03-02", "expense", "0.20", "a")],
            vec![entry("2024-03-01", "other", "12.5", "a"), entry("2024-03-02", "income", "0.3", "b")],
        ];
        for set in sets {
            let t = totals(&set).unwrap();
            assert_eq!(t.net, t.income - t.expense);
        }
        assert_eq!(totals(&[]).unwrap(), Totals::default());
    }

    #[test]
    fn test_filter_by_month_without_match_is_empty() {
        assert!(filter(&scenario(), &month("12")).is_empty());
    }

    #[test]
    fn test_filter_combines_criteria() {
        let criteria = EntryFilter {
            month: None,
            entry_type: Some("income".into()),
            editor: Some("alice".into()),
        };
        assert_eq!(filter(&scenario(), &criteria), vec![scenario()[0].clone()]);
    }

    #[test]
    fn test_empty_criteria_are_wildcards() {
        let criteria = EntryFilter {
            month: Some(String::new()),
            entry_type: Some(String::new()),
            editor: None,
        };
        assert_eq!(filter(&scenario(), &criteria), scenario());
    }

    #[test]
    fn test_malformed_date_never_matches_month() {
        let entries = vec![entry("20240105", "income", "1", "a"), entry("2024-01-05", "income", "1", "a")];
        assert_eq!(filter(&entries, &month("01")).len(), 1);
    }

    #[test]
    fn test_filter_options_are_distinct() {
        let options = FilterOptions::from_entries(&scenario());
        assert_eq!(options.months.into_iter().collect::<Vec<_>>(), vec!["01", "02"]);
        assert_eq!(options.entry_types.len(), 3);
        assert_eq!(options.editors.into_iter().collect::<Vec<_>>(), vec!["alice", "bob"]);
    }

    #[test]
    fn test_append_rejects_non_numeric_amount() {
        let temp_dir = TempDir::new().unwrap();
        let store = CsvStore::open(temp_dir.path(), "entries.csv", "users.csv").unwrap();
        let service = LedgerService::new(&store);

        let err = service.append(form("2024-01-05", "abc")).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "Amount must be a number"));
        assert!(service.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_rejects_negative_amount_and_bad_date() {
        let temp_dir = TempDir::new().unwrap();
        let store = CsvStore::open(temp_dir.path(), "entries.csv", "users.csv").unwrap();
        let service = LedgerService::new(&store);

        assert!(matches!(service.append(form("2024-01-05", "-5")), Err(AppError::Validation(_))));
        assert!(matches!(service.append(form("05/01/2024", "5")), Err(AppError::Validation(_))));
        assert!(matches!(service.append(form("2024-13-01", "5")), Err(AppError::Validation(_))));
        assert!(service.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_then_read_all() {
        let temp_dir = TempDir::new().unwrap();
        let store = CsvStore::open(temp_dir.path(), "entries.csv", "users.csv").unwrap();
        let service = LedgerService::new(&store);

        let saved = service.append(form(" 2024-01-05 ", "12.50")).unwrap();
        assert_eq!(saved.date, "2024-01-05");
        assert_eq!(service.read_all().unwrap(), vec![saved]);
        assert_eq!(totals(&service.read_all().unwrap()).unwrap().expense, Decimal::from_str("12.5").unwrap());
    }

    #[test]
    fn test_append_accepts_exponent_notation() {
        let temp_dir = TempDir::new().unwrap();
        let store = CsvStore::open(temp_dir.path(), "entries.csv", "users.csv").unwrap();
        let service = LedgerService::new(&store);

        let saved = service.append(form("2024-01-05", "1e5")).unwrap();
        assert_eq!(saved.amount, Decimal::from(100_000));
        assert_eq!(service.read_all().unwrap()[0].amount, Decimal::from(100_000));
    }

    #[test]
    fn test_totals_overflow_is_an_error() {
        let entries = vec![
            entry("2024-01-05", "expense", "79228162514264337593543950335", "a"),
            entry("2024-01-06", "expense", "1", "a"),
        ];
        assert!(matches!(totals(&entries), Err(AppError::Overflow)));

        let entries = vec![
            entry("2024-01-05", "income", "79228162514264337593543950335", "a"),
            entry("2024-01-06", "expense", "79228162514264337593543950335", "a"),
        ];
        assert_eq!(totals(&entries).unwrap().net, Decimal::ZERO);
    }

    #[test]
    fn test_append_rejects_amount_that_overflows_totals() {
        let temp_dir = TempDir::new().unwrap();
        let store = CsvStore::open(temp_dir.path(), "entries.csv", "users.csv").unwrap();
        let service = LedgerService::new(&store);

        service.append(form("2024-01-05", "79228162514264337593543950335")).unwrap();
        let err = service.append(form("2024-01-06", "1")).unwrap_err();

        assert!(matches!(err, AppError::Validation(ref msg) if msg == "Amount is too large for this ledger"));
        assert_eq!(store.read_entries().unwrap().len(), 1);
        assert!(totals(&service.read_all().unwrap()).is_ok());
    }
}
