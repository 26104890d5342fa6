use api_types::ErrorBody;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use password::hash_password;
pub use server::{app, run_with_listener};

mod accounts;
mod categories;
mod dashboard;
mod password;
mod server;
mod transactions;
mod users;

pub mod types {
    pub mod user {
        pub use api_types::user::{UserNew, UserView};
    }

    pub mod account {
        pub use api_types::account::{AccountNew, AccountView};
    }

    pub mod category {
        pub use api_types::category::{CategoryFilter, CategoryNew, CategoryView};
    }

    pub mod transaction {
        pub use api_types::transaction::{TransactionCreated, TransactionNew, TransactionView};
    }

    pub mod dashboard {
        pub use api_types::dashboard::Dashboard;
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Unauthorized,
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) | EngineError::TypeMismatch { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::ConflictRetryable(_)
        | EngineError::Conflict(_)
        | EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: &EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (
                status_for_engine_error(&err),
                ErrorBody {
                    error: err.kind().to_string(),
                    message: message_for_engine_error(&err),
                },
            ),
            ServerError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "unauthorized".to_string(),
                    message: "invalid credentials".to_string(),
                },
            ),
            ServerError::Generic(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "bad_request".to_string(),
                    message,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

pub(crate) fn parse_money(raw: &str) -> Result<engine::MoneyCents, ServerError> {
    Ok(raw.parse()?)
}

pub(crate) fn parse_kind(raw: &str) -> Result<engine::TransactionKind, ServerError> {
    Ok(raw.parse()?)
}
