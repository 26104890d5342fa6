use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*,
    sea_query::Expr,
};

use crate::{Account, EngineError, MoneyCents, ResultEngine, accounts};

use super::{Engine, MAX_ACCOUNT_KIND_LEN, MAX_NAME_LEN, normalize_required_text};

impl Engine {
    /// Open a new account for `user_id` with `initial_balance`.
    ///
    /// The initial balance must not be negative. After creation the balance
    /// only moves through [`Engine::create_transaction`].
    pub async fn new_account(
        &self,
        user_id: i64,
        name: &str,
        kind: &str,
        initial_balance: MoneyCents,
    ) -> ResultEngine<Account> {
        let name = normalize_required_text(name, "account name", MAX_NAME_LEN)?;
        let kind = normalize_required_text(kind, "account kind", MAX_ACCOUNT_KIND_LEN)?;
        if initial_balance.is_negative() {
            return Err(EngineError::Validation(
                "initial balance must not be negative".to_string(),
            ));
        }

        self.find_user(&self.database, user_id).await?;

        let active = accounts::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(name),
            kind: ActiveValue::Set(kind),
            balance: ActiveValue::Set(initial_balance.cents()),
        };
        let model = active.insert(&self.database).await?;
        tracing::debug!(account_id = model.id, user_id, "account created");
        Ok(model.into())
    }

    /// Return an account owned by `user_id`.
    pub async fn account(&self, account_id: i64, user_id: i64) -> ResultEngine<Account> {
        let model = self
            .require_account(&self.database, account_id, user_id)
            .await?;
        Ok(model.into())
    }

    /// All accounts of `user_id`, oldest first.
    pub async fn accounts(&self, user_id: i64) -> ResultEngine<Vec<Account>> {
        self.accounts_of(&self.database, user_id).await
    }

    pub(super) async fn accounts_of<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: i64,
    ) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::Id)
            .all(db)
            .await?;
        Ok(models.into_iter().map(Account::from).collect())
    }

    /// Fetch an account by id without any ownership check.
    pub(super) async fn find_account<C: ConnectionTrait>(
        &self,
        db: &C,
        account_id: i64,
    ) -> ResultEngine<accounts::Model> {
        accounts::Entity::find_by_id(account_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("account"))
    }

    /// Apply `delta` to the balance of `account_id` and return the new balance.
    ///
    /// Takes the open unit of work: the balance can only change together with
    /// the transaction row that justifies it. The write is a compare-and-set
    /// on `expected_balance`; if another writer got there first the error is
    /// `ConflictRetryable` and nothing is written.
    pub(super) async fn apply_account_delta(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: i64,
        expected_balance: MoneyCents,
        delta: MoneyCents,
    ) -> ResultEngine<MoneyCents> {
        let new_balance = expected_balance
            .checked_add(delta)
            .ok_or_else(|| EngineError::Validation("account balance overflow".to_string()))?;

        let result = accounts::Entity::update_many()
            .col_expr(accounts::Column::Balance, Expr::value(new_balance.cents()))
            .filter(accounts::Column::Id.eq(account_id))
            .filter(accounts::Column::Balance.eq(expected_balance.cents()))
            .exec(db_tx)
            .await?;

        if result.rows_affected == 0 {
            self.find_account(db_tx, account_id).await?;
            return Err(EngineError::ConflictRetryable(format!(
                "account {account_id}"
            )));
        }

        Ok(new_balance)
    }
}
