// src/services/payment_service.rs
//
// O registrador de pagamentos. Garante exatamente UM registro ativo por
// retorno-com-pagamento (pagamento implícito, payment_no = order_no) e cuida
// dos pagamentos diretos lançados contra a facção (payment_no = P####).

use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{MySqlConnection, MySqlPool};

use crate::{
    common::error::AppError,
    db::{sequence_repo, FactoryRepository, PaymentRepository},
    models::factory::FactoryStatus,
    models::orders::{PAYMENT_PREFIX, STATUS_VOIDED},
    models::payment::{CreatePaymentPayload, PaymentReceipt, PaymentRecord},
    services::ledger::{self, AccountPosition},
};

#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
    factory_repo: FactoryRepository,
    pool: MySqlPool,
}

impl PaymentService {
    pub fn new(
        payment_repo: PaymentRepository,
        factory_repo: FactoryRepository,
        pool: MySqlPool,
    ) -> Self {
        Self {
            payment_repo,
            factory_repo,
            pool,
        }
    }

    // Pagamento direto, independente de qualquer pedido. Numeração, inserção
    // e liquidação do razão acontecem na mesma transação, com a linha da
    // facção travada do início ao fim.
    pub async fn record_direct_payment(
        &self,
        org_id: i64,
        factory_id: i64,
        created_by: i64,
        payload: &CreatePaymentPayload,
    ) -> Result<PaymentReceipt, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .factory_repo
            .lock_position(&mut tx, org_id, factory_id)
            .await?
            .ok_or(AppError::FactoryNotFound)?;

        let payment_no = sequence_repo::next_doc_no(&mut tx, org_id, PAYMENT_PREFIX).await?;

        let image_urls = if payload.image_urls.is_empty() {
            None
        } else {
            Some(Json(payload.image_urls.clone()))
        };

        self.payment_repo
            .insert(
                &mut tx,
                org_id,
                factory_id,
                &payment_no,
                payload.amount,
                Some(&payload.payment_method),
                payload.remark.as_deref(),
                image_urls,
                created_by,
            )
            .await?;

        // pagamento puro: fee = 0
        let position = ledger::settle(
            AccountPosition::new(current.balance, current.debt),
            Decimal::ZERO,
            payload.amount,
        );

        self.factory_repo
            .update_position(&mut tx, org_id, factory_id, position.balance, position.debt)
            .await?;

        tx.commit().await?;

        Ok(PaymentReceipt {
            payment_no,
            new_balance: position.balance,
            new_debt: position.debt,
        })
    }

    // Anula um pagamento direto e desfaz só a metade "pagamento" da
    // liquidação (pagamento direto não tem fee associado).
    pub async fn void_direct_payment(
        &self,
        org_id: i64,
        factory_id: i64,
        payment_id: i64,
    ) -> Result<FactoryStatus, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .factory_repo
            .lock_position(&mut tx, org_id, factory_id)
            .await?
            .ok_or(AppError::FactoryNotFound)?;

        let record = self
            .payment_repo
            .get_for_update(&mut tx, org_id, factory_id, payment_id)
            .await?
            .ok_or(AppError::PaymentNotFound)?;

        if record.status == STATUS_VOIDED {
            return Err(AppError::PaymentAlreadyVoided);
        }

        let position = ledger::unwind(
            AccountPosition::new(current.balance, current.debt),
            Decimal::ZERO,
            record.amount,
        );

        self.factory_repo
            .update_position(&mut tx, org_id, factory_id, position.balance, position.debt)
            .await?;
        self.payment_repo
            .set_status(&mut tx, record.id, STATUS_VOIDED)
            .await?;

        tx.commit().await?;

        Ok(FactoryStatus {
            balance: position.balance,
            debt: position.debt,
        })
    }

    // Registro implícito: chamado na criação e na reativação de um retorno
    // com payment_amount > 0, DENTRO da transação do pedido. Idempotente —
    // se já existe registro ativo com esse order_no, não faz nada.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_implicit_payment(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        factory_id: i64,
        order_no: &str,
        amount: Decimal,
        payment_method: Option<&str>,
        created_by: i64,
    ) -> Result<(), AppError> {
        if amount <= Decimal::ZERO {
            return Ok(());
        }

        if self
            .payment_repo
            .find_active_by_no(conn, org_id, order_no)
            .await?
            .is_some()
        {
            return Ok(());
        }

        self.payment_repo
            .insert(
                conn,
                org_id,
                factory_id,
                order_no,
                amount,
                payment_method,
                None,
                None,
                created_by,
            )
            .await?;

        Ok(())
    }

    // Anula o registro implícito quando o retorno é anulado, dentro da mesma
    // transação. Devolve quantas linhas afetou; o chamador decide se a
    // ausência do registro é fatal.
    pub async fn void_implicit_payment(
        &self,
        conn: &mut MySqlConnection,
        org_id: i64,
        factory_id: i64,
        order_no: &str,
    ) -> Result<u64, AppError> {
        self.payment_repo
            .void_active_by_no(conn, org_id, factory_id, order_no)
            .await
    }

    pub async fn list_payments(
        &self,
        org_id: i64,
        factory_id: i64,
        only_created_by: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PaymentRecord>, AppError> {
        self.payment_repo
            .list_by_factory(org_id, factory_id, only_created_by, limit, offset)
            .await
    }
}
