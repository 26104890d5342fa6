//! Ownership guard.
//!
//! Every account, category or transaction fetched by id goes through
//! [`authorize`] before it is returned or acted upon. The policy is the same
//! for all entities: a missing row is `NotFound`, a row owned by someone else
//! is `Forbidden`.

use sea_orm::ConnectionTrait;

use crate::{EngineError, ResultEngine, accounts, categories, transactions};

use super::Engine;

/// Check that `user_id` is the owner of an `entity` owned by `owner_id`.
///
/// ```rust
/// use engine::{EngineError, authorize};
///
/// assert!(authorize(1, 1, "account").is_ok());
/// assert_eq!(
///     authorize(1, 2, "account"),
///     Err(EngineError::Forbidden("account belongs to another user".to_string()))
/// );
/// ```
pub fn authorize(user_id: i64, owner_id: i64, entity: &str) -> ResultEngine<()> {
    if user_id != owner_id {
        return Err(EngineError::Forbidden(format!(
            "{entity} belongs to another user"
        )));
    }
    Ok(())
}

impl Engine {
    pub(super) async fn require_account<C: ConnectionTrait>(
        &self,
        db: &C,
        account_id: i64,
        user_id: i64,
    ) -> ResultEngine<accounts::Model> {
        let model = self.find_account(db, account_id).await?;
        authorize(user_id, model.user_id, "account")?;
        Ok(model)
    }

    pub(super) async fn require_category<C: ConnectionTrait>(
        &self,
        db: &C,
        category_id: i64,
        user_id: i64,
    ) -> ResultEngine<categories::Model> {
        let model = self.find_category(db, category_id).await?;
        authorize(user_id, model.user_id, "category")?;
        Ok(model)
    }

    pub(super) async fn require_transaction<C: ConnectionTrait>(
        &self,
        db: &C,
        transaction_id: i64,
        user_id: i64,
    ) -> ResultEngine<transactions::Model> {
        let model = self.find_transaction(db, transaction_id).await?;
        authorize(user_id, model.user_id, "transaction")?;
        Ok(model)
    }
}
