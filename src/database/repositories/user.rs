use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::UserStore;
use crate::database::{
    models::{NewUser, User, UserFilter, UserPatch},
    utils::sql,
};
use crate::error::AppError;

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&sql(r#"
            SELECT
                id,
                email,
                password_hash,
                full_name,
                role,
                is_active,
                last_login,
                created_at
            FROM
                users
            WHERE
                (?::TEXT IS NULL OR email = ?)
                AND (? = FALSE OR is_active = TRUE)
            ORDER BY
                email
        "#))
        .bind(filter.email.as_deref())
        .bind(filter.email.as_deref())
        .bind(filter.active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&sql(r#"
            SELECT
                id,
                email,
                password_hash,
                full_name,
                role,
                is_active,
                last_login,
                created_at
            FROM
                users
            WHERE
                id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&sql(r#"
            INSERT INTO
                users (
                    email,
                    password_hash,
                    full_name,
                    role,
                    is_active
                )
            VALUES
                (?, ?, ?, ?, TRUE)
            RETURNING
                id,
                email,
                password_hash,
                full_name,
                role,
                is_active,
                last_login,
                created_at
        "#))
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.full_name)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::remote_write)?;

        Ok(user)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&sql(r#"
            UPDATE users
            SET
                full_name = COALESCE(?, full_name),
                role = COALESCE(?, role),
                is_active = COALESCE(?, is_active),
                password_hash = COALESCE(?, password_hash)
            WHERE
                id = ?
            RETURNING
                id,
                email,
                password_hash,
                full_name,
                role,
                is_active,
                last_login,
                created_at
        "#))
        .bind(patch.full_name)
        .bind(patch.role)
        .bind(patch.is_active)
        .bind(patch.password_hash)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::remote_write)?;

        Ok(user)
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(&sql(r#"
            UPDATE users
            SET
                last_login = ?
            WHERE
                id = ?
        "#))
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::remote_write)?;

        Ok(())
    }
}
