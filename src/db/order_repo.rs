// src/db/order_repo.rs

use sqlx::{MySqlConnection, MySqlPool};

use crate::{
    common::error::AppError,
    models::orders::{
        CreateReceiveOrderPayload, CreateSendOrderPayload, ReceiveOrder, ReceiveOrderItem,
        SendOrder, SendOrderItem,
    },
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: MySqlPool,
}

const SEND_COLUMNS: &str = "id, org_id, order_no, factory_id, process_id, total_weight, \
                            total_quantity, remark, status, created_by, created_at";

const RECEIVE_COLUMNS: &str = "id, org_id, order_no, factory_id, process_id, total_weight, \
                               total_quantity, total_fee, payment_amount, payment_method, \
                               remark, status, created_by, created_at";

impl OrderRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    // Validação dura antes de qualquer escrita: o processo tem que ser da
    // organização do usuário.
    pub async fn process_belongs_to_org(
        &self,
        org_id: i64,
        process_id: i64,
    ) -> Result<bool, AppError> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM processes WHERE org_id = ? AND id = ? AND status = 1",
        )
        .bind(org_id)
        .bind(process_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    // =========================================================================
    //  REMESSAS (send orders)
    // =========================================================================

    pub async fn insert_send_order(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        order_no: &str,
        payload: &CreateSendOrderPayload,
        created_by: i64,
    ) -> Result<i64, AppError> {
        let result = sqlx::query(
            "INSERT INTO send_orders \
             (org_id, order_no, factory_id, process_id, total_weight, total_quantity, remark, created_by) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(org_id)
        .bind(order_no)
        .bind(payload.factory_id)
        .bind(payload.process_id)
        .bind(payload.total_weight)
        .bind(payload.total_quantity)
        .bind(&payload.remark)
        .bind(created_by)
        .execute(&mut *conn)
        .await?;

        let order_id = result.last_insert_id() as i64;

        for item in &payload.items {
            sqlx::query(
                "INSERT INTO send_order_items \
                 (order_id, product_id, product_no, color_id, color_code, size_id, size_code, weight, quantity) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(&item.product_no)
            .bind(item.color_id)
            .bind(&item.color_code)
            .bind(item.size_id)
            .bind(&item.size_code)
            .bind(item.weight)
            .bind(item.quantity)
            .execute(&mut *conn)
            .await?;
        }

        Ok(order_id)
    }

    // Lock de linha no pedido: anulação e reativação concorrentes sobre o
    // mesmo pedido se serializam aqui.
    pub async fn get_send_for_update(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        id: i64,
    ) -> Result<Option<SendOrder>, AppError> {
        let order = sqlx::query_as::<_, SendOrder>(&format!(
            "SELECT {SEND_COLUMNS} FROM send_orders WHERE org_id = ? AND id = ? FOR UPDATE"
        ))
        .bind(org_id)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(order)
    }

    pub async fn set_send_status(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        id: i64,
        status: i8,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE send_orders SET status = ? WHERE org_id = ? AND id = ?")
            .bind(status)
            .bind(org_id)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn find_send(&self, org_id: i64, id: i64) -> Result<Option<SendOrder>, AppError> {
        let order = sqlx::query_as::<_, SendOrder>(&format!(
            "SELECT {SEND_COLUMNS} FROM send_orders WHERE org_id = ? AND id = ?"
        ))
        .bind(org_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn send_items(&self, order_id: i64) -> Result<Vec<SendOrderItem>, AppError> {
        let items = sqlx::query_as::<_, SendOrderItem>(
            "SELECT id, order_id, product_id, product_no, color_id, color_code, \
                    size_id, size_code, weight, quantity \
             FROM send_order_items WHERE order_id = ? ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn list_send(
        &self,
        org_id: i64,
        factory_id: Option<i64>,
        only_created_by: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SendOrder>, AppError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::MySql>::new(format!(
            "SELECT {SEND_COLUMNS} FROM send_orders WHERE org_id = "
        ));
        qb.push_bind(org_id);
        if let Some(factory_id) = factory_id {
            qb.push(" AND factory_id = ").push_bind(factory_id);
        }
        if let Some(user_id) = only_created_by {
            qb.push(" AND created_by = ").push_bind(user_id);
        }
        qb.push(" ORDER BY id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let orders = qb
            .build_query_as::<SendOrder>()
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    // =========================================================================
    //  RETORNOS (receive orders)
    // =========================================================================

    pub async fn insert_receive_order(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        order_no: &str,
        payload: &CreateReceiveOrderPayload,
        created_by: i64,
    ) -> Result<i64, AppError> {
        let result = sqlx::query(
            "INSERT INTO receive_orders \
             (org_id, order_no, factory_id, process_id, total_weight, total_quantity, \
              total_fee, payment_amount, payment_method, remark, created_by) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(org_id)
        .bind(order_no)
        .bind(payload.factory_id)
        .bind(payload.process_id)
        .bind(payload.total_weight)
        .bind(payload.total_quantity)
        .bind(payload.total_fee)
        .bind(payload.payment_amount)
        .bind(&payload.payment_method)
        .bind(&payload.remark)
        .bind(created_by)
        .execute(&mut *conn)
        .await?;

        let order_id = result.last_insert_id() as i64;

        for item in &payload.items {
            sqlx::query(
                "INSERT INTO receive_order_items \
                 (order_id, product_id, product_no, color_id, color_code, size_id, size_code, \
                  weight, quantity, fee) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(&item.product_no)
            .bind(item.color_id)
            .bind(&item.color_code)
            .bind(item.size_id)
            .bind(&item.size_code)
            .bind(item.weight)
            .bind(item.quantity)
            .bind(item.fee)
            .execute(&mut *conn)
            .await?;
        }

        Ok(order_id)
    }

    pub async fn get_receive_for_update(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        id: i64,
    ) -> Result<Option<ReceiveOrder>, AppError> {
        let order = sqlx::query_as::<_, ReceiveOrder>(&format!(
            "SELECT {RECEIVE_COLUMNS} FROM receive_orders WHERE org_id = ? AND id = ? FOR UPDATE"
        ))
        .bind(org_id)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(order)
    }

    pub async fn set_receive_status(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        id: i64,
        status: i8,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE receive_orders SET status = ? WHERE org_id = ? AND id = ?")
            .bind(status)
            .bind(org_id)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn find_receive(
        &self,
        org_id: i64,
        id: i64,
    ) -> Result<Option<ReceiveOrder>, AppError> {
        let order = sqlx::query_as::<_, ReceiveOrder>(&format!(
            "SELECT {RECEIVE_COLUMNS} FROM receive_orders WHERE org_id = ? AND id = ?"
        ))
        .bind(org_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn receive_items(&self, order_id: i64) -> Result<Vec<ReceiveOrderItem>, AppError> {
        let items = sqlx::query_as::<_, ReceiveOrderItem>(
            "SELECT id, order_id, product_id, product_no, color_id, color_code, \
                    size_id, size_code, weight, quantity, fee \
             FROM receive_order_items WHERE order_id = ? ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn list_receive(
        &self,
        org_id: i64,
        factory_id: Option<i64>,
        only_created_by: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReceiveOrder>, AppError> {
        let mut qb = sqlx::QueryBuilder::<sqlx::MySql>::new(format!(
            "SELECT {RECEIVE_COLUMNS} FROM receive_orders WHERE org_id = "
        ));
        qb.push_bind(org_id);
        if let Some(factory_id) = factory_id {
            qb.push(" AND factory_id = ").push_bind(factory_id);
        }
        if let Some(user_id) = only_created_by {
            qb.push(" AND created_by = ").push_bind(user_id);
        }
        qb.push(" ORDER BY id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let orders = qb
            .build_query_as::<ReceiveOrder>()
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }
}
