//! Accounts API endpoints.

use api_types::account::{AccountNew, AccountView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::MoneyCents;

use crate::{
    ServerError, parse_money,
    server::{AuthUser, ServerState},
};

pub(crate) fn map_account(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        kind: account.kind,
        balance: account.balance.to_string(),
    }
}

pub async fn create(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let initial_balance = match payload.initial_balance.as_deref() {
        Some(raw) => parse_money(raw)?,
        None => MoneyCents::ZERO,
    };
    let account = state
        .engine
        .new_account(user_id, &payload.name, &payload.kind, initial_balance)
        .await?;
    Ok((StatusCode::CREATED, Json(map_account(account))))
}

pub async fn list(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state
        .engine
        .accounts(user_id)
        .await?
        .into_iter()
        .map(map_account)
        .collect();
    Ok(Json(accounts))
}

pub async fn get(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(account_id): Path<i64>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(account_id, user_id).await?;
    Ok(Json(map_account(account)))
}
