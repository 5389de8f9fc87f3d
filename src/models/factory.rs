// src/models/factory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// A facção (fábrica terceirizada) com sua conta corrente embutida:
// balance = crédito da organização junto à facção,
// debt    = quanto a organização deve à facção por fees não pagos.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Factory {
    pub id: i64,

    #[schema(ignore)]
    pub org_id: i64,

    #[schema(example = "Facção Santa Rita")]
    pub name: String,

    pub contact: Option<String>,
    pub phone: Option<String>,

    #[schema(example = "0.00")]
    pub balance: Decimal,

    #[schema(example = "1500.00")]
    pub debt: Decimal,

    pub status: i8,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

// Recorte da conta devolvido por toda operação que mexe no razão
// (criação/anulação/reativação de pedidos e pagamentos).
#[derive(Debug, Clone, Copy, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FactoryStatus {
    #[schema(example = "0.00")]
    pub balance: Decimal,
    #[schema(example = "350.00")]
    pub debt: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFactoryPayload {
    // Se vier orgId no corpo, ele é conferido contra o usuário autenticado
    // e DEPOIS descartado — nunca é usado em query.
    pub org_id: Option<i64>,

    #[validate(length(min = 1, max = 120, message = "O nome é obrigatório."))]
    pub name: String,

    pub contact: Option<String>,
    pub phone: Option<String>,
}
