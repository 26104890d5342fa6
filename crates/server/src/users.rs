//! Registration and profile endpoints.

use api_types::user::{UserNew, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::EngineError;

use crate::{
    ServerError, password,
    server::{AuthUser, ServerState},
};

const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn map_user(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        name: user.name,
        email: user.email,
        created_at: user.created_at,
    }
}

/// Public: create a user with an Argon2-hashed password.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(EngineError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ))
        .into());
    }

    let password_hash = password::hash_password(&payload.password).map_err(|err| {
        tracing::error!("failed to hash password: {err}");
        ServerError::Generic("failed to hash password".to_string())
    })?;
    let user = state
        .engine
        .new_user(&payload.name, &payload.email, &password_hash)
        .await?;

    tracing::info!(user_id = user.id, "user registered");
    Ok((StatusCode::CREATED, Json(map_user(user))))
}

pub async fn me(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.user(user_id).await?;
    Ok(Json(map_user(user)))
}
