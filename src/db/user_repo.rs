// src/db/user_repo.rs

use sqlx::MySqlPool;

use crate::{common::error::AppError, models::auth::User};

// O repositório de usuários, responsável pelas interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: MySqlPool,
}

const USER_COLUMNS: &str =
    "id, org_id, username, password_hash, role_id, is_super_admin, created_at";

impl UserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
