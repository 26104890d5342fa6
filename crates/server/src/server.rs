use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use serde_json::{Value, json};

use std::sync::Arc;

use crate::{ServerError, accounts, categories, dashboard, password, transactions, users};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Id of the user who passed the `auth` middleware.
///
/// Handlers never read a user id from the request body: the actor is always
/// the authenticated one.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser(pub i64);

/// Basic authentication: email as username, checked against the Argon2 hash.
async fn auth(
    State(state): State<ServerState>,
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(credentials)) = auth_header else {
        return Err(ServerError::Unauthorized);
    };
    if credentials.username().is_empty() || credentials.password().is_empty() {
        return Err(ServerError::Unauthorized);
    }

    let Some(user) = state.engine.user_credentials(credentials.username()).await? else {
        return Err(ServerError::Unauthorized);
    };

    let password = credentials.password().to_string();
    let stored_hash = user.password_hash;
    let verified = tokio::task::spawn_blocking(move || {
        password::verify_password(&password, &stored_hash)
    })
    .await
    .unwrap_or(false);
    if !verified {
        return Err(ServerError::Unauthorized);
    }

    request.extensions_mut().insert(AuthUser(user.id));
    Ok(next.run(request).await)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the HTTP application around `engine`.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/me", get(users::me))
        .route("/accounts", post(accounts::create).get(accounts::list))
        .route("/accounts/{id}", get(accounts::get))
        .route("/categories", post(categories::create).get(categories::list))
        .route("/categories/{id}", get(categories::get))
        .route(
            "/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route("/transactions/{id}", get(transactions::get))
        .route("/dashboard", get(dashboard::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/health", get(health))
        .route("/users", post(users::register))
        .merge(protected)
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}
