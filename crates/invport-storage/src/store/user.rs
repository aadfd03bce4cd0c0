use anyhow::Result;
use chrono::Utc;
use invport_common::types::{CreateUserRequest, Role, UpdateUserRequest, User};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::entities::user::{self, Column, Entity};
use crate::store::InventoryStore;

fn to_user(m: user::Model) -> User {
    User {
        id: m.id,
        username: m.username,
        email: m.email,
        password_hash: m.password_hash,
        role: m.role.parse().unwrap_or_default(),
        is_active: m.is_active,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

impl InventoryStore {
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let model = Entity::find_by_id(id).one(self.db()).await?;
        Ok(model.map(to_user))
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let model = Entity::find()
            .filter(Column::Username.eq(username))
            .one(self.db())
            .await?;
        Ok(model.map(to_user))
    }

    /// Pre-insert conflict check: any existing user with this username or
    /// email.
    pub async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>> {
        let model = Entity::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(username))
                    .add(Column::Email.eq(email)),
            )
            .one(self.db())
            .await?;
        Ok(model.map(to_user))
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let rows = Entity::find()
            .order_by(Column::CreatedAt, Order::Asc)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_user).collect())
    }

    pub async fn create_user(&self, req: &CreateUserRequest, password_hash: &str) -> Result<User> {
        let id = invport_common::id::next_id();
        let now = Utc::now().fixed_offset();
        let am = user::ActiveModel {
            id: Set(id),
            username: Set(req.username.clone()),
            email: Set(req.email.clone()),
            password_hash: Set(password_hash.to_owned()),
            role: Set(req.role.unwrap_or_default().as_str().to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = am.insert(self.db()).await?;
        Ok(to_user(model))
    }

    /// Update everything except the password; that path intentionally does
    /// not exist. Returns `None` when the user does not exist.
    pub async fn update_user(&self, id: &str, req: &UpdateUserRequest) -> Result<Option<User>> {
        let Some(model) = Entity::find_by_id(id).one(self.db()).await? else {
            return Ok(None);
        };
        let mut am: user::ActiveModel = model.into();
        if let Some(v) = &req.username {
            am.username = Set(v.clone());
        }
        if let Some(v) = &req.email {
            am.email = Set(v.clone());
        }
        if let Some(v) = req.role {
            am.role = Set(v.as_str().to_string());
        }
        if let Some(v) = req.is_active {
            am.is_active = Set(v);
        }
        am.updated_at = Set(Utc::now().fixed_offset());
        let updated = am.update(self.db()).await?;
        Ok(Some(to_user(updated)))
    }

    pub async fn delete_user(&self, id: &str) -> Result<bool> {
        let res = Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(res.rows_affected > 0)
    }

    /// Flip the active flag. Deactivated accounts fail authentication even
    /// with valid credentials.
    pub async fn toggle_user_active(&self, id: &str) -> Result<Option<User>> {
        let Some(model) = Entity::find_by_id(id).one(self.db()).await? else {
            return Ok(None);
        };
        let is_active = model.is_active;
        let mut am: user::ActiveModel = model.into();
        am.is_active = Set(!is_active);
        am.updated_at = Set(Utc::now().fixed_offset());
        let updated = am.update(self.db()).await?;
        Ok(Some(to_user(updated)))
    }

    pub async fn count_active_users(&self) -> Result<u64> {
        Ok(Entity::find()
            .filter(Column::IsActive.eq(true))
            .count(self.db())
            .await?)
    }

    /// Idempotent bootstrap: create the account when the username is free,
    /// otherwise return the existing one untouched.
    pub async fn ensure_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User> {
        if let Some(existing) = self.get_user_by_username(username).await? {
            return Ok(existing);
        }
        self.create_user(
            &CreateUserRequest {
                username: username.to_string(),
                email: email.to_string(),
                password: String::new(),
                role: Some(role),
            },
            password_hash,
        )
        .await
    }
}
