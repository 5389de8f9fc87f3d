// src/db/statement_repo.rs
//
// Consultas SOMENTE LEITURA do extrato de conferência. Nada aqui abre
// transação nem toca no razão; o motor de reconciliação refaz os agregados
// a partir destas linhas cruas.

use sqlx::MySqlPool;

use crate::{
    common::db_utils::DateRange,
    common::error::AppError,
    models::statement::{PaymentRow, ReceiveItemRow, SendItemRow},
};

#[derive(Clone)]
pub struct StatementRepository {
    pool: MySqlPool,
}

impl StatementRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn send_items_in_range(
        &self,
        org_id: i64,
        factory_id: i64,
        range: DateRange,
        product_id: Option<i64>,
    ) -> Result<Vec<SendItemRow>, AppError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::MySql>::new(
            "SELECT si.order_id, o.order_no, o.created_at AS order_date, \
                    p.name AS process_name, si.product_no, si.weight, si.quantity \
             FROM send_order_items si \
             JOIN send_orders o ON o.id = si.order_id \
             JOIN processes p ON p.id = o.process_id \
             WHERE o.org_id = ",
        );
        qb.push_bind(org_id);
        qb.push(" AND o.factory_id = ").push_bind(factory_id);
        qb.push(" AND o.status = 1");
        if let Some(start) = range.start {
            qb.push(" AND DATE(o.created_at) >= ").push_bind(start);
        }
        if let Some(end) = range.end {
            qb.push(" AND DATE(o.created_at) <= ").push_bind(end);
        }
        if let Some(product_id) = product_id {
            qb.push(" AND si.product_id = ").push_bind(product_id);
        }
        qb.push(" ORDER BY o.created_at, si.id");

        let rows = qb
            .build_query_as::<SendItemRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn receive_items_in_range(
        &self,
        org_id: i64,
        factory_id: i64,
        range: DateRange,
        product_id: Option<i64>,
    ) -> Result<Vec<ReceiveItemRow>, AppError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::MySql>::new(
            "SELECT ri.order_id, o.order_no, o.created_at AS order_date, \
                    p.name AS process_name, ri.product_no, ri.weight, ri.quantity, \
                    ri.fee, o.total_fee, o.payment_amount \
             FROM receive_order_items ri \
             JOIN receive_orders o ON o.id = ri.order_id \
             JOIN processes p ON p.id = o.process_id \
             WHERE o.org_id = ",
        );
        qb.push_bind(org_id);
        qb.push(" AND o.factory_id = ").push_bind(factory_id);
        qb.push(" AND o.status = 1");
        if let Some(start) = range.start {
            qb.push(" AND DATE(o.created_at) >= ").push_bind(start);
        }
        if let Some(end) = range.end {
            qb.push(" AND DATE(o.created_at) <= ").push_bind(end);
        }
        if let Some(product_id) = product_id {
            qb.push(" AND ri.product_id = ").push_bind(product_id);
        }
        qb.push(" ORDER BY o.created_at, ri.id");

        let rows = qb
            .build_query_as::<ReceiveItemRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    // Pagamentos ativos no intervalo, SEM distinguir diretos de implícitos:
    // a exclusão dos implícitos (payment_no igual a um order_no de retorno)
    // é responsabilidade do motor de reconciliação, cruzando com
    // receive_order_numbers().
    pub async fn payments_in_range(
        &self,
        org_id: i64,
        factory_id: i64,
        range: DateRange,
    ) -> Result<Vec<PaymentRow>, AppError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::MySql>::new(
            "SELECT fp.payment_no, fp.amount, fp.created_at AS paid_at \
             FROM factory_payments fp \
             WHERE fp.org_id = ",
        );
        qb.push_bind(org_id);
        qb.push(" AND fp.factory_id = ").push_bind(factory_id);
        qb.push(" AND fp.status = 1");
        if let Some(start) = range.start {
            qb.push(" AND DATE(fp.created_at) >= ").push_bind(start);
        }
        if let Some(end) = range.end {
            qb.push(" AND DATE(fp.created_at) <= ").push_bind(end);
        }
        qb.push(" ORDER BY fp.created_at, fp.id");

        let rows = qb
            .build_query_as::<PaymentRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    // Todos os order_no de retorno da organização, sem filtro de facção nem
    // de data — a exclusão de pagamentos implícitos no extrato é incondicional,
    // mesmo para retornos fora do intervalo pedido.
    pub async fn receive_order_numbers(&self, org_id: i64) -> Result<Vec<String>, AppError> {
        let numbers =
            sqlx::query_scalar::<_, String>("SELECT order_no FROM receive_orders WHERE org_id = ?")
                .bind(org_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(numbers)
    }
}
