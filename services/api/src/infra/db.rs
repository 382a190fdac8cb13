use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use abha_api_schema::users;

use crate::domain::repository::UserDirectory;
use crate::domain::types::{NewUser, UserRecord};
use crate::error::ApiServiceError;

// ── User directory ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserDirectory {
    pub db: DatabaseConnection,
}

impl UserDirectory for DbUserDirectory {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, ApiServiceError> {
        let model = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            abha_id: Set(user.abha_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(user_from_model(model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, ApiServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }
}

fn user_from_model(m: users::Model) -> UserRecord {
    UserRecord {
        id: m.id,
        username: m.username,
        email: m.email,
        password_hash: m.password_hash,
        abha_id: m.abha_id,
        created_at: m.created_at,
    }
}
