//! Command structs for engine write operations.
//!
//! These types group parameters for the ledger write path, keeping call sites
//! readable and avoiding long argument lists.

use chrono::NaiveDate;

use crate::{MoneyCents, TransactionKind};

/// Create a transaction and book it on an account.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    /// Authenticated actor. Must own both the account and the category.
    pub user_id: i64,
    pub account_id: i64,
    pub category_id: i64,
    pub kind: TransactionKind,
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub description: String,
    /// Client supplied key making retries safe: a second request with the same
    /// key returns the first transaction instead of booking it twice.
    pub idempotency_key: Option<String>,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: i64,
        account_id: i64,
        category_id: i64,
        kind: TransactionKind,
        amount: MoneyCents,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            account_id,
            category_id,
            kind,
            amount,
            date,
            description: description.into(),
            idempotency_key: None,
        }
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}
