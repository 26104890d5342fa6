//! Transactions API endpoints.

use api_types::transaction::{TransactionCreated, TransactionNew, TransactionView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use engine::{EngineError, NewTransactionCmd};

use crate::{
    ServerError, parse_kind, parse_money,
    server::{AuthUser, ServerState},
};

pub(crate) fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        account_id: tx.account_id,
        category_id: tx.category_id,
        kind: tx.kind.to_string(),
        amount: tx.amount.to_string(),
        date: tx.date,
        description: tx.description,
        idempotency_key: tx.idempotency_key,
        created_at: tx.created_at,
    }
}

fn parse_id(value: i64, field: &str) -> Result<i64, ServerError> {
    if value <= 0 {
        return Err(EngineError::Validation(format!("{field} must be a positive integer")).into());
    }
    Ok(value)
}

fn parse_date(raw: &str) -> Result<NaiveDate, ServerError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ServerError::from(EngineError::Validation(format!(
            "invalid date: {raw}, expected YYYY-MM-DD"
        )))
    })
}

fn parse_request(user_id: i64, payload: TransactionNew) -> Result<NewTransactionCmd, ServerError> {
    let cmd = NewTransactionCmd::new(
        user_id,
        parse_id(payload.account_id, "account_id")?,
        parse_id(payload.category_id, "category_id")?,
        parse_kind(&payload.kind)?,
        parse_money(&payload.amount)?,
        parse_date(&payload.date)?,
        payload.description,
    );
    Ok(match payload.idempotency_key {
        Some(key) => cmd.idempotency_key(key),
        None => cmd,
    })
}

/// Book a transaction. A replayed idempotent request answers `200 OK` with
/// the original transaction instead of `201 Created`.
pub async fn create(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let cmd = parse_request(user_id, payload)?;
    let receipt = match state.engine.create_transaction(cmd).await {
        Ok(receipt) => receipt,
        Err(err) => {
            tracing::info!(user_id, "transaction rejected: {err}");
            return Err(err.into());
        }
    };

    let status = if receipt.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(TransactionCreated {
            transaction: map_transaction(receipt.transaction),
            balance: receipt.balance.to_string(),
            replayed: receipt.replayed,
        }),
    ))
}

pub async fn list(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let transactions = state
        .engine
        .transactions(user_id)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();
    Ok(Json(transactions))
}

pub async fn get(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<i64>,
) -> Result<Json<TransactionView>, ServerError> {
    let transaction = state.engine.transaction(transaction_id, user_id).await?;
    Ok(Json(map_transaction(transaction)))
}
