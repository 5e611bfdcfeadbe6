use crate::error::{ErrorType, IntoResult, Res};
use crate::model::{Amount, TransactionDate};
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Whether a transaction is money coming in (`positive`) or going out (`negative`).
///
/// Early versions of the registration form stored `up` and `down`; those are accepted as aliases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[serde(alias = "up")]
    Positive,
    #[serde(alias = "down")]
    Negative,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// The category a transaction was filed under, e.g. `{ "name": "Alimentação", "icon": "coffee" }`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "CategoryRepr")]
pub struct Category {
    name: String,
    icon: String,
}

impl Category {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }
}

/// Older payloads stored only the category key as a bare string.
#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryRepr {
    Full {
        name: String,
        #[serde(default)]
        icon: String,
    },
    Key(String),
}

impl From<CategoryRepr> for Category {
    fn from(value: CategoryRepr) -> Self {
        match value {
            CategoryRepr::Full { name, icon } => Category { name, icon },
            CategoryRepr::Key(name) => Category {
                name,
                icon: String::new(),
            },
        }
    }
}

/// One persisted financial movement. Records are read-only once loaded.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    id: String,
    name: String,
    amount: Amount,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    category: Category,
    date: TransactionDate,
}

impl TransactionRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        amount: Amount,
        transaction_type: TransactionType,
        category: Category,
        date: TransactionDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
            transaction_type,
            category,
            date,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn date(&self) -> &TransactionDate {
        &self.date
    }
}

/// Parses the persisted payload: a JSON array of transaction records.
///
/// # Errors
/// Returns an `ErrorType::Parse` error if `json` is not a valid array of records.
pub fn parse_transactions(json: &str) -> Result<Vec<TransactionRecord>> {
    parse_transactions_inner(json).pub_result(ErrorType::Parse)
}

fn parse_transactions_inner(json: &str) -> Res<Vec<TransactionRecord>> {
    serde_json::from_str(json).context("Unable to parse the stored transactions")
}

/// Serializes records into the payload format read by `parse_transactions`.
pub fn serialize_transactions(records: &[TransactionRecord]) -> Result<String> {
    serde_json::to_string(records)
        .context("Unable to serialize transactions")
        .pub_result(ErrorType::Parse)
}
