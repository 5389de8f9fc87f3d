// src/models/statement.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// Query string do extrato de conferência (statement).
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatementQuery {
    #[schema(example = "Facção Santa Rita")]
    pub factory_name: String,
    #[schema(example = "2024-01-01")]
    pub start_date: Option<String>,
    #[schema(example = "2024-01-31")]
    pub end_date: Option<String>,
    pub product_id: Option<i64>,
}

// =============================================================================
//  Linhas cruas vindas do repositório (somente leitura).
// =============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct SendItemRow {
    pub order_id: i64,
    pub order_no: String,
    pub order_date: DateTime<Utc>,
    pub process_name: String,
    pub product_no: String,
    pub weight: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReceiveItemRow {
    pub order_id: i64,
    pub order_no: String,
    pub order_date: DateTime<Utc>,
    pub process_name: String,
    pub product_no: String,
    pub weight: Decimal,
    pub quantity: i32,
    // fee da linha (usado no resumo por modelo)
    pub fee: Decimal,
    // fee e pagamento do PEDIDO inteiro (deduplicados por pedido)
    pub total_fee: Decimal,
    pub payment_amount: Decimal,
}

// Registro de pagamento ativo no intervalo, direto OU implícito: quem
// separa os dois é o motor de reconciliação, cruzando o payment_no com os
// order_no de retorno conhecidos da organização.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentRow {
    pub payment_no: String,
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
}

// =============================================================================
//  Saída agregada do extrato.
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessComparison {
    pub process_name: String,
    pub send_weight: Decimal,
    pub receive_weight: Decimal,
    // (enviado - recebido) / enviado * 100; 0 quando nada foi enviado
    pub loss_rate: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StyleSummary {
    #[schema(example = "ST-2024-031")]
    pub product_no: String,
    pub send_weight: Decimal,
    pub receive_weight: Decimal,
    pub quantity: i32,
    // soma dos fees de linha deste modelo
    pub fee: Decimal,
    // parcela dos pagamentos distribuída proporcionalmente ao fee
    pub paid_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatementOrder {
    #[schema(example = "receive")]
    pub kind: String,
    pub order_no: String,
    pub order_date: DateTime<Utc>,
    pub process_name: String,
    pub weight: Decimal,
    pub quantity: i32,
    pub fee: Option<Decimal>,
    pub payment_amount: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatementReport {
    pub factory_id: i64,
    pub factory_name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,

    pub send_weight: Decimal,
    pub receive_weight: Decimal,
    pub loss_rate: Decimal,

    pub total_fee: Decimal,
    pub paid_amount: Decimal,
    pub unpaid_amount: Decimal,

    pub process_comparison: Vec<ProcessComparison>,
    pub style_summary: Vec<StyleSummary>,
    pub orders: Vec<StatementOrder>,
}
