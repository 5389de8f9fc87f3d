// src/models/orders.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// Estados do ciclo de vida: ativo <-> anulado, sempre reversível.
pub const STATUS_ACTIVE: i8 = 1;
pub const STATUS_VOIDED: i8 = 0;

// Prefixos da numeração sequencial por organização.
pub const SEND_ORDER_PREFIX: char = 'F';
pub const RECEIVE_ORDER_PREFIX: char = 'S';
pub const PAYMENT_PREFIX: char = 'P';

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// =============================================================================
//  REMESSA (send order): despacho de mercadoria crua para a facção.
// =============================================================================

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendOrder {
    pub id: i64,
    #[schema(ignore)]
    pub org_id: i64,
    #[schema(example = "F0012")]
    pub order_no: String,
    pub factory_id: i64,
    pub process_id: i64,
    pub total_weight: Decimal,
    pub total_quantity: i32,
    pub remark: Option<String>,
    pub status: i8,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendOrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    #[schema(example = "ST-2024-031")]
    pub product_no: String,
    pub color_id: Option<i64>,
    pub color_code: Option<String>,
    pub size_id: Option<i64>,
    pub size_code: Option<String>,
    pub weight: Decimal,
    pub quantity: i32,
}

// =============================================================================
//  RETORNO (receive order): mercadoria beneficiada voltando da facção,
//  carregando o fee devido e o pagamento eventualmente feito na entrega.
// =============================================================================

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveOrder {
    pub id: i64,
    #[schema(ignore)]
    pub org_id: i64,
    #[schema(example = "S0047")]
    pub order_no: String,
    pub factory_id: i64,
    pub process_id: i64,
    pub total_weight: Decimal,
    pub total_quantity: i32,
    pub total_fee: Decimal,
    pub payment_amount: Decimal,
    pub payment_method: Option<String>,
    pub remark: Option<String>,
    pub status: i8,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveOrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_no: String,
    pub color_id: Option<i64>,
    pub color_code: Option<String>,
    pub size_id: Option<i64>,
    pub size_code: Option<String>,
    pub weight: Decimal,
    pub quantity: i32,
    pub fee: Decimal,
}

// Pedido + itens, para a tela de detalhe.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendOrderDetail {
    #[serde(flatten)]
    pub order: SendOrder,
    pub items: Vec<SendOrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveOrderDetail {
    #[serde(flatten)]
    pub order: ReceiveOrder,
    pub items: Vec<ReceiveOrderItem>,
}

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendItemPayload {
    pub product_id: i64,

    #[validate(length(min = 1, message = "O número do modelo é obrigatório."))]
    pub product_no: String,

    pub color_id: Option<i64>,
    pub color_code: Option<String>,
    pub size_id: Option<i64>,
    pub size_code: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub weight: Decimal,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSendOrderPayload {
    // Conferido contra o usuário autenticado e descartado (anti-vazamento
    // entre organizações).
    pub org_id: Option<i64>,

    pub factory_id: i64,
    pub process_id: i64,

    #[validate(custom(function = "validate_not_negative"))]
    pub total_weight: Decimal,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub total_quantity: i32,

    pub remark: Option<String>,

    #[validate(length(min = 1, message = "O pedido precisa de ao menos um item."))]
    #[validate(nested)]
    pub items: Vec<SendItemPayload>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveItemPayload {
    pub product_id: i64,

    #[validate(length(min = 1, message = "O número do modelo é obrigatório."))]
    pub product_no: String,

    pub color_id: Option<i64>,
    pub color_code: Option<String>,
    pub size_id: Option<i64>,
    pub size_code: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub weight: Decimal,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i32,

    // Fee da linha; a soma das linhas deveria bater com totalFee do pedido
    // (divergência é logada, não rejeitada).
    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub fee: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceiveOrderPayload {
    pub org_id: Option<i64>,

    pub factory_id: i64,
    pub process_id: i64,

    #[validate(custom(function = "validate_not_negative"))]
    pub total_weight: Decimal,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub total_quantity: i32,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub total_fee: Decimal,

    // Pagamento feito no ato da entrega; se > 0 vira um PaymentRecord
    // implícito com payment_no = order_no.
    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub payment_amount: Decimal,

    pub payment_method: Option<String>,
    pub remark: Option<String>,

    #[validate(length(min = 1, message = "O pedido precisa de ao menos um item."))]
    #[validate(nested)]
    pub items: Vec<ReceiveItemPayload>,
}

impl CreateReceiveOrderPayload {
    pub fn items_fee_sum(&self) -> Decimal {
        self.items.iter().map(|i| i.fee).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(fee: i64) -> ReceiveItemPayload {
        ReceiveItemPayload {
            product_id: 1,
            product_no: "ST-2024-031".into(),
            color_id: None,
            color_code: None,
            size_id: None,
            size_code: None,
            weight: Decimal::from(10),
            quantity: 5,
            fee: Decimal::from(fee),
        }
    }

    fn payload(items: Vec<ReceiveItemPayload>) -> CreateReceiveOrderPayload {
        CreateReceiveOrderPayload {
            org_id: None,
            factory_id: 1,
            process_id: 1,
            total_weight: Decimal::from(10),
            total_quantity: 5,
            total_fee: Decimal::from(100),
            payment_amount: Decimal::ZERO,
            payment_method: None,
            remark: None,
            items,
        }
    }

    #[test]
    fn payload_completo_passa_na_validacao() {
        assert!(payload(vec![item(60), item(40)]).validate().is_ok());
    }

    #[test]
    fn pedido_sem_itens_e_rejeitado() {
        let err = payload(vec![]).validate().unwrap_err();
        assert!(err.field_errors().contains_key("items"));
    }

    #[test]
    fn valores_negativos_sao_rejeitados() {
        let mut p = payload(vec![item(100)]);
        p.total_fee = Decimal::from(-1);
        assert!(p.validate().is_err());

        let mut p = payload(vec![item(100)]);
        p.items[0].weight = Decimal::from(-5);
        assert!(p.validate().is_err());
    }

    #[test]
    fn soma_dos_fees_de_linha() {
        assert_eq!(payload(vec![item(60), item(40)]).items_fee_sum(), Decimal::from(100));
    }
}
