// src/db/payment_repo.rs

use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{MySqlConnection, MySqlPool};

use crate::{common::error::AppError, models::payment::PaymentRecord};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: MySqlPool,
}

const PAYMENT_COLUMNS: &str = "id, org_id, factory_id, payment_no, amount, payment_method, \
                               remark, image_urls, status, created_by, created_at";

impl PaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    // Busca o registro ATIVO com este payment_no. Linhas anuladas de ciclos
    // anteriores de anular/reativar podem coexistir com o mesmo número.
    pub async fn find_active_by_no(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        payment_no: &str,
    ) -> Result<Option<PaymentRecord>, AppError> {
        let record = sqlx::query_as::<_, PaymentRecord>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM factory_payments \
             WHERE org_id = ? AND payment_no = ? AND status = 1"
        ))
        .bind(org_id)
        .bind(payment_no)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        factory_id: i64,
        payment_no: &str,
        amount: Decimal,
        payment_method: Option<&str>,
        remark: Option<&str>,
        image_urls: Option<Json<Vec<String>>>,
        created_by: i64,
    ) -> Result<i64, AppError> {
        let result = sqlx::query(
            "INSERT INTO factory_payments \
             (org_id, factory_id, payment_no, amount, payment_method, remark, image_urls, created_by) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(org_id)
        .bind(factory_id)
        .bind(payment_no)
        .bind(amount)
        .bind(payment_method)
        .bind(remark)
        .bind(image_urls)
        .bind(created_by)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    // Anula o registro ativo com este payment_no; devolve quantas linhas
    // foram afetadas para o chamador decidir se a ausência é erro.
    pub async fn void_active_by_no(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        factory_id: i64,
        payment_no: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE factory_payments SET status = 0 \
             WHERE org_id = ? AND factory_id = ? AND payment_no = ? AND status = 1",
        )
        .bind(org_id)
        .bind(factory_id)
        .bind(payment_no)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn get_for_update(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        factory_id: i64,
        payment_id: i64,
    ) -> Result<Option<PaymentRecord>, AppError> {
        let record = sqlx::query_as::<_, PaymentRecord>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM factory_payments \
             WHERE org_id = ? AND factory_id = ? AND id = ? FOR UPDATE"
        ))
        .bind(org_id)
        .bind(factory_id)
        .bind(payment_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    pub async fn set_status(
        &self,
        conn: &mut MySqlConnection,
        id: i64,
        status: i8,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE factory_payments SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn list_by_factory(
        &self,
        org_id: i64,
        factory_id: i64,
        only_created_by: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PaymentRecord>, AppError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::MySql>::new(format!(
            "SELECT {PAYMENT_COLUMNS} FROM factory_payments WHERE org_id = "
        ));
        qb.push_bind(org_id);
        qb.push(" AND factory_id = ").push_bind(factory_id);
        if let Some(user_id) = only_created_by {
            qb.push(" AND created_by = ").push_bind(user_id);
        }
        qb.push(" ORDER BY id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let records = qb
            .build_query_as::<PaymentRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }
}
