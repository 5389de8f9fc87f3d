// src/db/factory_repo.rs

use rust_decimal::Decimal;
use sqlx::{MySqlConnection, MySqlPool};

use crate::{
    common::error::AppError,
    models::factory::{CreateFactoryPayload, Factory, FactoryStatus},
};

#[derive(Clone)]
pub struct FactoryRepository {
    pool: MySqlPool,
}

const FACTORY_COLUMNS: &str =
    "id, org_id, name, contact, phone, balance, debt, status, created_by, created_at";

impl FactoryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    // A conta corrente nasce zerada junto com a facção.
    pub async fn create(
        &self,
        org_id: i64,
        payload: &CreateFactoryPayload,
        created_by: i64,
    ) -> Result<Factory, AppError> {
        let result = sqlx::query(
            "INSERT INTO factories (org_id, name, contact, phone, balance, debt, created_by) \
             VALUES (?, ?, ?, ?, 0, 0, ?)",
        )
        .bind(org_id)
        .bind(&payload.name)
        .bind(&payload.contact)
        .bind(&payload.phone)
        .bind(created_by)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(org_id, id)
            .await?
            .ok_or(AppError::FactoryNotFound)
    }

    pub async fn find_by_id(&self, org_id: i64, id: i64) -> Result<Option<Factory>, AppError> {
        let factory = sqlx::query_as::<_, Factory>(&format!(
            "SELECT {FACTORY_COLUMNS} FROM factories WHERE org_id = ? AND id = ?"
        ))
        .bind(org_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(factory)
    }

    pub async fn find_by_name(&self, org_id: i64, name: &str) -> Result<Option<Factory>, AppError> {
        let factory = sqlx::query_as::<_, Factory>(&format!(
            "SELECT {FACTORY_COLUMNS} FROM factories WHERE org_id = ? AND name = ?"
        ))
        .bind(org_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(factory)
    }

    pub async fn list(
        &self,
        org_id: i64,
        only_created_by: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Factory>, AppError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::MySql>::new(format!(
            "SELECT {FACTORY_COLUMNS} FROM factories WHERE org_id = "
        ));
        qb.push_bind(org_id);
        if let Some(user_id) = only_created_by {
            qb.push(" AND created_by = ").push_bind(user_id);
        }
        qb.push(" ORDER BY id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let factories = qb
            .build_query_as::<Factory>()
            .fetch_all(&self.pool)
            .await?;

        Ok(factories)
    }

    // Lê a posição (balance, debt) com lock de linha. Toda mutação do razão
    // passa por aqui dentro de uma transação, o que serializa as operações
    // concorrentes sobre a mesma facção.
    pub async fn lock_position(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        factory_id: i64,
    ) -> Result<Option<FactoryStatus>, AppError> {
        let position = sqlx::query_as::<_, FactoryStatus>(
            "SELECT balance, debt FROM factories WHERE org_id = ? AND id = ? FOR UPDATE",
        )
        .bind(org_id)
        .bind(factory_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(position)
    }

    pub async fn update_position(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        factory_id: i64,
        balance: Decimal,
        debt: Decimal,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE factories SET balance = ?, debt = ? WHERE org_id = ? AND id = ?")
            .bind(balance)
            .bind(debt)
            .bind(org_id)
            .bind(factory_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
