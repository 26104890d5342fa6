//! Ledger transaction processor.
//!
//! Creating a transaction is the only write that touches an account balance.
//! The checks run in a fixed order so the same bad request always yields the
//! same error:
//!
//! 1. the account exists and belongs to the actor;
//! 2. the category exists and belongs to the actor;
//! 3. the transaction kind matches the category kind;
//! 4. amount, description and idempotency key are well formed;
//! 5. the transaction row and the balance change are committed together.
//!
//! Writers on the same account are serialized by the per-account lock, and
//! the balance write itself is a compare-and-set, so a balance is never
//! computed from a stale read.

use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, MoneyCents, NewTransactionCmd, ResultEngine, Transaction, TransactionKind,
    transactions,
};

use super::{
    Engine, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, normalize_optional_text, normalize_required_text,
    with_tx,
};

/// Outcome of [`Engine::create_transaction`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction: Transaction,
    /// Account balance right after the commit (or the current balance when the
    /// request was a replay).
    pub balance: MoneyCents,
    /// `true` when an earlier transaction with the same idempotency key was
    /// returned and nothing new was booked.
    pub replayed: bool,
}

/// Normalized free-text fields of a request.
struct ValidatedTransaction {
    description: String,
    idempotency_key: Option<String>,
}

impl Engine {
    /// Create a transaction and apply its signed amount to the account
    /// balance, atomically.
    ///
    /// Collisions with concurrent writers are retried up to the configured
    /// number of attempts; after that the call fails with
    /// [`EngineError::Conflict`]. Every failed attempt is rolled back as a
    /// whole.
    pub async fn create_transaction(
        &self,
        cmd: NewTransactionCmd,
    ) -> ResultEngine<TransactionReceipt> {
        let _account_guard = self.locks.acquire(cmd.account_id).await;

        let mut attempt = 1;
        loop {
            match self.try_commit(&cmd).await {
                Err(err) if err.is_retryable() => {
                    if attempt >= self.max_commit_attempts {
                        tracing::warn!(
                            account_id = cmd.account_id,
                            attempts = attempt,
                            "giving up on contended transaction: {err}"
                        );
                        return Err(EngineError::Conflict(format!(
                            "account {} is busy, retry later",
                            cmd.account_id
                        )));
                    }
                    tracing::warn!(
                        account_id = cmd.account_id,
                        attempt,
                        "retrying transaction commit: {err}"
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// One attempt of the write path: a unit of work that commits on success
    /// and rolls back on any error.
    async fn try_commit(&self, cmd: &NewTransactionCmd) -> ResultEngine<TransactionReceipt> {
        with_tx!(self, |db_tx| self.commit_transaction(&db_tx, cmd).await)
    }

    async fn commit_transaction(
        &self,
        db_tx: &DatabaseTransaction,
        cmd: &NewTransactionCmd,
    ) -> ResultEngine<TransactionReceipt> {
        let account = self
            .require_account(db_tx, cmd.account_id, cmd.user_id)
            .await?;
        let category = self
            .require_category(db_tx, cmd.category_id, cmd.user_id)
            .await?;

        let category_kind = TransactionKind::try_from(category.kind.as_str())?;
        if cmd.kind != category_kind {
            return Err(EngineError::TypeMismatch {
                transaction: cmd.kind,
                category: category_kind,
            });
        }

        let validated = validate_request(cmd)?;

        if let Some(key) = validated.idempotency_key.as_deref()
            && let Some(existing) = self.find_by_idempotency_key(db_tx, cmd.user_id, key).await?
        {
            return self.replay(db_tx, cmd, &validated, existing).await;
        }

        let active = transactions::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(cmd.user_id),
            account_id: ActiveValue::Set(account.id),
            category_id: ActiveValue::Set(category.id),
            kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
            amount: ActiveValue::Set(cmd.amount.cents()),
            date: ActiveValue::Set(cmd.date),
            description: ActiveValue::Set(validated.description.clone()),
            idempotency_key: ActiveValue::Set(validated.idempotency_key.clone()),
            created_at: ActiveValue::Set(Utc::now()),
        };
        let model = match active.insert(db_tx).await {
            Ok(model) => model,
            Err(err) => {
                // Same key raced in through another account's lock.
                if let Some(key) = validated.idempotency_key.as_deref()
                    && let Some(existing) =
                        self.find_by_idempotency_key(db_tx, cmd.user_id, key).await?
                {
                    return self.replay(db_tx, cmd, &validated, existing).await;
                }
                return Err(err.into());
            }
        };

        let transaction = Transaction::try_from(model)?;
        let balance = self
            .apply_account_delta(
                db_tx,
                account.id,
                MoneyCents::new(account.balance),
                transaction.delta(),
            )
            .await?;

        tracing::debug!(
            transaction_id = transaction.id,
            account_id = account.id,
            delta = %transaction.delta(),
            %balance,
            "transaction booked"
        );

        Ok(TransactionReceipt {
            transaction,
            balance,
            replayed: false,
        })
    }

    async fn find_by_idempotency_key<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: i64,
        key: &str,
    ) -> ResultEngine<Option<transactions::Model>> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::IdempotencyKey.eq(key))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Answer a repeated request with the transaction it already created.
    ///
    /// Every field of the request has to match the stored transaction,
    /// comparing the description after normalization.
    async fn replay(
        &self,
        db_tx: &DatabaseTransaction,
        cmd: &NewTransactionCmd,
        validated: &ValidatedTransaction,
        existing: transactions::Model,
    ) -> ResultEngine<TransactionReceipt> {
        let transaction = Transaction::try_from(existing)?;
        let same_request = transaction.account_id == cmd.account_id
            && transaction.category_id == cmd.category_id
            && transaction.kind == cmd.kind
            && transaction.amount == cmd.amount
            && transaction.date == cmd.date
            && transaction.description == validated.description;
        if !same_request {
            return Err(EngineError::Validation(
                "idempotency key already used for a different transaction".to_string(),
            ));
        }

        let account = self.find_account(db_tx, transaction.account_id).await?;
        tracing::debug!(transaction_id = transaction.id, "idempotent replay");
        Ok(TransactionReceipt {
            transaction,
            balance: MoneyCents::new(account.balance),
            replayed: true,
        })
    }

    /// Return a transaction owned by `user_id`.
    pub async fn transaction(
        &self,
        transaction_id: i64,
        user_id: i64,
    ) -> ResultEngine<Transaction> {
        let model = self
            .require_transaction(&self.database, transaction_id, user_id)
            .await?;
        Transaction::try_from(model)
    }

    /// All transactions of `user_id`, newest first.
    pub async fn transactions(&self, user_id: i64) -> ResultEngine<Vec<Transaction>> {
        self.transactions_of(&self.database, user_id).await
    }

    pub(super) async fn transactions_of<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: i64,
    ) -> ResultEngine<Vec<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Fetch a transaction by id without any ownership check.
    pub(super) async fn find_transaction<C: ConnectionTrait>(
        &self,
        db: &C,
        transaction_id: i64,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(transaction_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("transaction"))
    }
}

fn validate_request(cmd: &NewTransactionCmd) -> ResultEngine<ValidatedTransaction> {
    if !cmd.amount.is_positive() {
        return Err(EngineError::Validation("amount must be > 0".to_string()));
    }
    let description = normalize_required_text(&cmd.description, "description", MAX_DESCRIPTION_LEN)?;
    let idempotency_key = normalize_optional_text(cmd.idempotency_key.as_deref());
    if let Some(key) = idempotency_key.as_deref()
        && key.chars().count() > MAX_NAME_LEN
    {
        return Err(EngineError::Validation(format!(
            "idempotency key must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(ValidatedTransaction {
        description,
        idempotency_key,
    })
}
