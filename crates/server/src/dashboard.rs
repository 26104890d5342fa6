use api_types::dashboard::Dashboard;
use axum::{Extension, Json, extract::State};

use crate::{
    ServerError, accounts::map_account, categories::map_category,
    server::{AuthUser, ServerState},
    transactions::map_transaction, users::map_user,
};

pub async fn get(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Dashboard>, ServerError> {
    let dashboard = state.engine.dashboard(user_id).await?;
    Ok(Json(Dashboard {
        user: map_user(dashboard.user),
        accounts: dashboard.accounts.into_iter().map(map_account).collect(),
        categories: dashboard.categories.into_iter().map(map_category).collect(),
        transactions: dashboard
            .transactions
            .into_iter()
            .map(map_transaction)
            .collect(),
    }))
}
