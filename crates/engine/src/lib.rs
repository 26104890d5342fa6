//! Ledger consistency engine.
//!
//! Users own accounts and categories; every transaction moves exactly one
//! account balance by its signed amount. All writes go through [`Engine`],
//! which validates ownership and kinds, then books the transaction row and the
//! balance change in a single unit of work.

pub use accounts::Account;
pub use categories::Category;
pub use commands::NewTransactionCmd;
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{Dashboard, Engine, EngineBuilder, TransactionReceipt, authorize};
pub use transactions::{Transaction, TransactionKind};
pub use users::{User, UserCredentials};

mod accounts;
mod categories;
mod commands;
mod error;
mod locks;
mod money;
mod ops;
mod transactions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
