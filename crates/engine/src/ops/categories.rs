use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{Category, EngineError, ResultEngine, TransactionKind, categories};

use super::{Engine, MAX_NAME_LEN, normalize_required_text};

impl Engine {
    /// Register a category for `user_id`. The kind is fixed for its lifetime.
    pub async fn new_category(
        &self,
        user_id: i64,
        name: &str,
        kind: TransactionKind,
    ) -> ResultEngine<Category> {
        let name = normalize_required_text(name, "category name", MAX_NAME_LEN)?;
        self.find_user(&self.database, user_id).await?;

        let active = categories::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(name),
            kind: ActiveValue::Set(kind.as_str().to_string()),
        };
        let model = active.insert(&self.database).await?;
        tracing::debug!(category_id = model.id, user_id, %kind, "category created");
        Category::try_from(model)
    }

    /// Return a category owned by `user_id`.
    pub async fn category(&self, category_id: i64, user_id: i64) -> ResultEngine<Category> {
        let model = self
            .require_category(&self.database, category_id, user_id)
            .await?;
        Category::try_from(model)
    }

    /// All categories of `user_id`, oldest first.
    pub async fn categories(&self, user_id: i64) -> ResultEngine<Vec<Category>> {
        self.categories_of(&self.database, user_id, None).await
    }

    /// Categories of `user_id` with the given kind.
    pub async fn categories_by_kind(
        &self,
        user_id: i64,
        kind: TransactionKind,
    ) -> ResultEngine<Vec<Category>> {
        self.categories_of(&self.database, user_id, Some(kind))
            .await
    }

    pub(super) async fn categories_of<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: i64,
        kind: Option<TransactionKind>,
    ) -> ResultEngine<Vec<Category>> {
        let mut query = categories::Entity::find().filter(categories::Column::UserId.eq(user_id));
        if let Some(kind) = kind {
            query = query.filter(categories::Column::Kind.eq(kind.as_str()));
        }
        query
            .order_by_asc(categories::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    /// Fetch a category by id without any ownership check.
    pub(super) async fn find_category<C: ConnectionTrait>(
        &self,
        db: &C,
        category_id: i64,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("category"))
    }
}
