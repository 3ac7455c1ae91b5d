use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Entry types counted as income. Every other type is an expense.
pub const INCOME_TYPES: [&str; 2] = ["income", "capital_credit"];

/// One ledger row. Field order is the column order on disk.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Entry {
    pub date: String,
    pub entry_type: String,
    pub description: String,
    #[serde(with = "amount_format")]
    pub amount: Decimal,
    pub editor: String,
}

impl Entry {
    pub fn is_income(&self) -> bool {
        INCOME_TYPES.contains(&self.entry_type.as_str())
    }

    /// Second `-` separated component of the date, e.g. "01" for "2024-01-05".
    pub fn month(&self) -> Option<&str> {
        self.date.split('-').nth(1)
    }
}

/// Parses an amount in plain ("12.50") or exponent ("1e5") notation.
/// Used for both form input and stored rows.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

// Amounts are kept as text on disk so sums stay exact. Older files were
// written from floats and may contain exponent notation.
mod amount_format {
    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_amount(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid amount {:?}", raw)))
    }
}
