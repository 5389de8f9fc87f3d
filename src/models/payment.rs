// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// Origem do dinheiro num registro de pagamento:
// - direto: lançado manualmente contra a facção (payment_no = P####);
// - implícito: embutido num retorno (payment_no = order_no do retorno).
// A distinção não é uma coluna — é o próprio payment_no, que serve de
// chave de deduplicação no extrato.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: i64,

    #[schema(ignore)]
    pub org_id: i64,

    pub factory_id: i64,

    #[schema(example = "P0009")]
    pub payment_no: String,

    #[schema(example = "350.00")]
    pub amount: Decimal,

    pub payment_method: Option<String>,
    pub remark: Option<String>,

    #[schema(value_type = Option<Vec<String>>)]
    pub image_urls: Option<Json<Vec<String>>>,

    pub status: i8,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || val.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    #[validate(custom(function = "validate_positive"))]
    pub amount: Decimal,

    #[validate(length(min = 1, message = "A forma de pagamento é obrigatória."))]
    pub payment_method: String,

    pub remark: Option<String>,

    #[serde(default)]
    pub image_urls: Vec<String>,
}

// Resposta do lançamento de pagamento direto.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    #[schema(example = "P0010")]
    pub payment_no: String,
    pub new_balance: Decimal,
    pub new_debt: Decimal,
}
