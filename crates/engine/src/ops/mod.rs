use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine, locks::AccountLocks};

mod access;
mod accounts;
mod categories;
mod dashboard;
mod transactions;
mod users;

pub use access::authorize;
pub use dashboard::Dashboard;
pub use transactions::TransactionReceipt;

const DEFAULT_MAX_COMMIT_ATTEMPTS: u32 = 5;
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(10);

const MAX_NAME_LEN: usize = 255;
const MAX_ACCOUNT_KIND_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 500;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// The rollback happens when the uncommitted `DatabaseTransaction` is dropped.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    locks: AccountLocks,
    max_commit_attempts: u32,
    retry_backoff: Duration,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Trim `value` and check it is non-empty and at most `max_len` characters.
fn normalize_required_text(value: &str, label: &str, max_len: usize) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} must not be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(EngineError::Validation(format!(
            "{label} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    max_commit_attempts: u32,
    retry_backoff: Duration,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            max_commit_attempts: DEFAULT_MAX_COMMIT_ATTEMPTS,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// How many times a transaction commit is attempted when it collides with
    /// a concurrent writer. Values below 1 are treated as 1.
    pub fn max_commit_attempts(mut self, attempts: u32) -> EngineBuilder {
        self.max_commit_attempts = attempts.max(1);
        self
    }

    /// Base delay between two commit attempts; grows linearly per attempt.
    pub fn retry_backoff(mut self, backoff: Duration) -> EngineBuilder {
        self.retry_backoff = backoff;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            locks: AccountLocks::default(),
            max_commit_attempts: self.max_commit_attempts,
            retry_backoff: self.retry_backoff,
        })
    }
}
