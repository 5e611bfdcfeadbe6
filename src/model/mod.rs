//! Types that represent the persisted data model, such as `TransactionRecord` and `Amount`.
mod amount;
mod date;
mod transaction;
mod user;

pub use amount::{Amount, AmountError};
pub use date::TransactionDate;
pub use transaction::{
    parse_transactions, serialize_transactions, Category, TransactionRecord, TransactionType,
};
pub use user::UserProfile;
