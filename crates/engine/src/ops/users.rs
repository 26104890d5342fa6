use chrono::Utc;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, SqlErr, prelude::*};

use crate::{EngineError, ResultEngine, User, UserCredentials, users};

use super::{Engine, MAX_NAME_LEN, normalize_required_text};

fn normalize_email(email: &str) -> ResultEngine<String> {
    let email = normalize_required_text(email, "email", MAX_NAME_LEN)?.to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(EngineError::Validation(format!("invalid email: {email}")));
    }
    Ok(email)
}

impl Engine {
    /// Store a new user.
    ///
    /// `password_hash` is stored as given: hashing and verification belong to
    /// the authentication layer. Emails are unique, compared case-insensitively.
    pub async fn new_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> ResultEngine<User> {
        let name = normalize_required_text(name, "user name", MAX_NAME_LEN)?;
        let email = normalize_email(email)?;
        if password_hash.is_empty() {
            return Err(EngineError::Validation(
                "password hash must not be empty".to_string(),
            ));
        }

        let active = users::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name),
            email: ActiveValue::Set(email.clone()),
            password_hash: ActiveValue::Set(password_hash.to_string()),
            created_at: ActiveValue::Set(Utc::now()),
        };
        // The unique index on email decides, so concurrent registrations
        // with the same address cannot both win.
        let model = match active.insert(&self.database).await {
            Ok(model) => model,
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(EngineError::ExistingKey(email));
            }
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(user_id = model.id, "user created");
        Ok(model.into())
    }

    /// Profile of `user_id`.
    pub async fn user(&self, user_id: i64) -> ResultEngine<User> {
        Ok(self.find_user(&self.database, user_id).await?.into())
    }

    /// Credentials of the user registered with `email`, if any.
    pub async fn user_credentials(&self, email: &str) -> ResultEngine<Option<UserCredentials>> {
        let email = email.trim().to_lowercase();
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.database)
            .await?;
        Ok(model.map(UserCredentials::from))
    }

    pub(super) async fn find_user<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: i64,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::not_found("user"))
    }
}
