// src/services/order_service.rs
//
// O gerenciador do ciclo de vida dos pedidos: ativo <-> anulado, sempre
// reversível. Cada transição aplica (ou desfaz) o efeito no razão da facção
// e no registro de pagamento implícito dentro de UMA transação — ou tudo
// entra, ou nada entra.

use anyhow::anyhow;
use sqlx::MySqlPool;

use crate::{
    common::error::AppError,
    db::{sequence_repo, FactoryRepository, OrderRepository},
    models::factory::FactoryStatus,
    models::orders::{
        CreateReceiveOrderPayload, CreateSendOrderPayload, ReceiveOrder, ReceiveOrderDetail,
        SendOrder, SendOrderDetail, RECEIVE_ORDER_PREFIX, SEND_ORDER_PREFIX, STATUS_ACTIVE,
        STATUS_VOIDED,
    },
    services::ledger::{self, AccountPosition},
    services::payment_service::PaymentService,
};

// Resultado da criação de um pedido: id, número gerado e a posição da conta
// da facção depois da liquidação.
pub struct CreatedOrder {
    pub id: i64,
    pub order_no: String,
    pub factory_status: FactoryStatus,
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    factory_repo: FactoryRepository,
    payment_service: PaymentService,
    pool: MySqlPool,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        factory_repo: FactoryRepository,
        payment_service: PaymentService,
        pool: MySqlPool,
    ) -> Self {
        Self {
            order_repo,
            factory_repo,
            payment_service,
            pool,
        }
    }

    // =========================================================================
    //  RETORNOS (receive orders) — as transições que mexem no razão.
    // =========================================================================

    pub async fn create_receive_order(
        &self,
        org_id: i64,
        created_by: i64,
        payload: &CreateReceiveOrderPayload,
    ) -> Result<CreatedOrder, AppError> {
        // validação dura antes de abrir transação
        if !self
            .order_repo
            .process_belongs_to_org(org_id, payload.process_id)
            .await?
        {
            return Err(AppError::ProcessNotFound);
        }

        // a soma dos fees de linha deveria bater com o total do pedido;
        // divergência não bloqueia, mas fica registrada
        let items_sum = payload.items_fee_sum();
        if items_sum != payload.total_fee {
            tracing::warn!(
                total_fee = %payload.total_fee,
                items_sum = %items_sum,
                "soma dos fees de linha diverge do totalFee do pedido"
            );
        }

        let mut tx = self.pool.begin().await?;

        let current = self
            .factory_repo
            .lock_position(&mut tx, org_id, payload.factory_id)
            .await?
            .ok_or(AppError::FactoryNotFound)?;

        let order_no = sequence_repo::next_doc_no(&mut tx, org_id, RECEIVE_ORDER_PREFIX).await?;

        let order_id = self
            .order_repo
            .insert_receive_order(&mut tx, org_id, &order_no, payload, created_by)
            .await?;

        let position = ledger::settle(
            AccountPosition::new(current.balance, current.debt),
            payload.total_fee,
            payload.payment_amount,
        );

        self.factory_repo
            .update_position(&mut tx, org_id, payload.factory_id, position.balance, position.debt)
            .await?;

        // pagamento feito na entrega vira um registro implícito com
        // payment_no = order_no (a chave de deduplicação do extrato)
        self.payment_service
            .record_implicit_payment(
                &mut tx,
                org_id,
                payload.factory_id,
                &order_no,
                payload.payment_amount,
                payload.payment_method.as_deref(),
                created_by,
            )
            .await?;

        tx.commit().await?;

        Ok(CreatedOrder {
            id: order_id,
            order_no,
            factory_status: FactoryStatus {
                balance: position.balance,
                debt: position.debt,
            },
        })
    }

    pub async fn void_receive_order(
        &self,
        org_id: i64,
        order_id: i64,
    ) -> Result<FactoryStatus, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .get_receive_for_update(&mut tx, org_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if order.status == STATUS_VOIDED {
            return Err(AppError::OrderAlreadyVoided);
        }

        let current = self
            .factory_repo
            .lock_position(&mut tx, org_id, order.factory_id)
            .await?
            .ok_or(AppError::FactoryNotFound)?;

        let position = ledger::unwind(
            AccountPosition::new(current.balance, current.debt),
            order.total_fee,
            order.payment_amount,
        );

        self.factory_repo
            .update_position(&mut tx, org_id, order.factory_id, position.balance, position.debt)
            .await?;

        // A consistência pagamento/razão vem antes de completar a anulação:
        // se o registro implícito não está lá para ser anulado, a transação
        // inteira volta e o pedido permanece ativo.
        if order.payment_amount > rust_decimal::Decimal::ZERO {
            let voided = self
                .payment_service
                .void_implicit_payment(&mut tx, org_id, order.factory_id, &order.order_no)
                .await?;

            if voided == 0 {
                return Err(AppError::InternalServerError(anyhow!(
                    "registro de pagamento implícito ausente para o pedido {}",
                    order.order_no
                )));
            }
        }

        self.order_repo
            .set_receive_status(&mut tx, org_id, order_id, STATUS_VOIDED)
            .await?;

        tx.commit().await?;

        Ok(FactoryStatus {
            balance: position.balance,
            debt: position.debt,
        })
    }

    pub async fn enable_receive_order(
        &self,
        org_id: i64,
        order_id: i64,
        user_id: i64,
    ) -> Result<FactoryStatus, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .get_receive_for_update(&mut tx, org_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if order.status == STATUS_ACTIVE {
            return Err(AppError::OrderAlreadyActive);
        }

        let current = self
            .factory_repo
            .lock_position(&mut tx, org_id, order.factory_id)
            .await?
            .ok_or(AppError::FactoryNotFound)?;

        // reaplica a liquidação original com o fee/pagamento gravados
        let position = ledger::settle(
            AccountPosition::new(current.balance, current.debt),
            order.total_fee,
            order.payment_amount,
        );

        self.factory_repo
            .update_position(&mut tx, org_id, order.factory_id, position.balance, position.debt)
            .await?;

        // recria o registro implícito se o pedido tem pagamento e nenhum
        // registro ativo existe (idempotente)
        self.payment_service
            .record_implicit_payment(
                &mut tx,
                org_id,
                order.factory_id,
                &order.order_no,
                order.payment_amount,
                order.payment_method.as_deref(),
                user_id,
            )
            .await?;

        self.order_repo
            .set_receive_status(&mut tx, org_id, order_id, STATUS_ACTIVE)
            .await?;

        tx.commit().await?;

        Ok(FactoryStatus {
            balance: position.balance,
            debt: position.debt,
        })
    }

    pub async fn get_receive_detail(
        &self,
        org_id: i64,
        order_id: i64,
    ) -> Result<ReceiveOrderDetail, AppError> {
        let order = self
            .order_repo
            .find_receive(org_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        let items = self.order_repo.receive_items(order.id).await?;

        Ok(ReceiveOrderDetail { order, items })
    }

    pub async fn list_receive_orders(
        &self,
        org_id: i64,
        factory_id: Option<i64>,
        only_created_by: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReceiveOrder>, AppError> {
        self.order_repo
            .list_receive(org_id, factory_id, only_created_by, limit, offset)
            .await
    }

    // =========================================================================
    //  REMESSAS (send orders) — mesmo ciclo de vida, sem efeito no razão.
    // =========================================================================

    pub async fn create_send_order(
        &self,
        org_id: i64,
        created_by: i64,
        payload: &CreateSendOrderPayload,
    ) -> Result<CreatedOrder, AppError> {
        if !self
            .order_repo
            .process_belongs_to_org(org_id, payload.process_id)
            .await?
        {
            return Err(AppError::ProcessNotFound);
        }

        let factory = self
            .factory_repo
            .find_by_id(org_id, payload.factory_id)
            .await?
            .ok_or(AppError::FactoryNotFound)?;

        let mut tx = self.pool.begin().await?;

        let order_no = sequence_repo::next_doc_no(&mut tx, org_id, SEND_ORDER_PREFIX).await?;

        let order_id = self
            .order_repo
            .insert_send_order(&mut tx, org_id, &order_no, payload, created_by)
            .await?;

        tx.commit().await?;

        Ok(CreatedOrder {
            id: order_id,
            order_no,
            factory_status: FactoryStatus {
                balance: factory.balance,
                debt: factory.debt,
            },
        })
    }

    pub async fn void_send_order(&self, org_id: i64, order_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .get_send_for_update(&mut tx, org_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if order.status == STATUS_VOIDED {
            return Err(AppError::OrderAlreadyVoided);
        }

        self.order_repo
            .set_send_status(&mut tx, org_id, order_id, STATUS_VOIDED)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn enable_send_order(&self, org_id: i64, order_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .get_send_for_update(&mut tx, org_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if order.status == STATUS_ACTIVE {
            return Err(AppError::OrderAlreadyActive);
        }

        self.order_repo
            .set_send_status(&mut tx, org_id, order_id, STATUS_ACTIVE)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_send_detail(
        &self,
        org_id: i64,
        order_id: i64,
    ) -> Result<SendOrderDetail, AppError> {
        let order = self
            .order_repo
            .find_send(org_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        let items = self.order_repo.send_items(order.id).await?;

        Ok(SendOrderDetail { order, items })
    }

    pub async fn list_send_orders(
        &self,
        org_id: i64,
        factory_id: Option<i64>,
        only_created_by: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SendOrder>, AppError> {
        self.order_repo
            .list_send(org_id, factory_id, only_created_by, limit, offset)
            .await
    }
}
