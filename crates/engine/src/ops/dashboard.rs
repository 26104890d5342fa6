use sea_orm::{DatabaseTransaction, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::{Account, Category, ResultEngine, Transaction, User};

use super::{Engine, with_tx};

/// Everything a user owns, read from one snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub user: User,
    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
}

impl Engine {
    /// Profile, accounts, categories and transactions of `user_id`.
    ///
    /// All reads share one database transaction so balances and transaction
    /// history come from the same point in time.
    pub async fn dashboard(&self, user_id: i64) -> ResultEngine<Dashboard> {
        with_tx!(self, |db_tx| self.read_dashboard(&db_tx, user_id).await)
    }

    async fn read_dashboard(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: i64,
    ) -> ResultEngine<Dashboard> {
        let user = self.find_user(db_tx, user_id).await?;
        Ok(Dashboard {
            user: user.into(),
            accounts: self.accounts_of(db_tx, user_id).await?,
            categories: self.categories_of(db_tx, user_id, None).await?,
            transactions: self.transactions_of(db_tx, user_id).await?,
        })
    }
}
