// src/handlers/statement.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{i18n::Locale, tenancy::OrgScope},
    models::statement::StatementQuery,
};

// GET /api/statement — o extrato de conferência da facção no intervalo.
// Somente leitura; não abre transação nem toca no razão.
#[utoipa::path(
    get,
    path = "/api/statement",
    tag = "Statement",
    params(
        ("factoryName" = String, Query, description = "Nome da facção (escopado pela organização)"),
        ("startDate" = Option<String>, Query, description = "YYYY-MM-DD"),
        ("endDate" = Option<String>, Query, description = "YYYY-MM-DD"),
        ("productId" = Option<i64>, Query, description = "Filtra itens por produto")
    ),
    responses(
        (status = 200, description = "Extrato agregado", body = crate::models::statement::StatementReport),
        (status = 400, description = "Intervalo de datas inválido"),
        (status = 404, description = "Facção não encontrada nesta organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_statement(
    State(app_state): State<AppState>,
    locale: Locale,
    OrgScope(org_id): OrgScope,
    Query(query): Query<StatementQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .statement_service
        .generate(org_id, &query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "success": true, "data": report })))
}
