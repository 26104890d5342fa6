//! Wire types shared by the HTTP server and its clients.
//!
//! Money travels as decimal strings (`"1250.00"`) and transaction kinds as
//! `"income"` / `"expense"`; the server parses both into engine types.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine readable code, e.g. `type_mismatch`.
    pub error: String,
    pub message: String,
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub name: String,
        pub email: String,
        /// Plain text, at least 6 characters. Only its Argon2 hash is stored.
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i64,
        pub name: String,
        pub email: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        /// Free-form label: `bank`, `cash`, `savings`...
        pub kind: String,
        /// Decimal string, defaults to `"0.00"`.
        pub initial_balance: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: i64,
        pub name: String,
        pub kind: String,
        pub balance: String,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub kind: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i64,
        pub name: String,
        pub kind: String,
    }

    /// Query string of `GET /categories`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryFilter {
        pub kind: Option<String>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub account_id: i64,
        pub category_id: i64,
        /// `income` or `expense`, case-insensitive.
        pub kind: String,
        /// Decimal string, must be > 0.
        pub amount: String,
        /// `YYYY-MM-DD`.
        pub date: String,
        pub description: String,
        /// Optional idempotency key for safely retrying the same create request.
        pub idempotency_key: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i64,
        pub account_id: i64,
        pub category_id: i64,
        pub kind: String,
        pub amount: String,
        pub date: NaiveDate,
        pub description: String,
        pub idempotency_key: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub transaction: TransactionView,
        /// Account balance after the transaction was applied.
        pub balance: String,
        /// `true` when the idempotency key matched an earlier request.
        pub replayed: bool,
    }
}

pub mod dashboard {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Dashboard {
        pub user: user::UserView,
        pub accounts: Vec<account::AccountView>,
        pub categories: Vec<category::CategoryView>,
        pub transactions: Vec<transaction::TransactionView>,
    }
}
