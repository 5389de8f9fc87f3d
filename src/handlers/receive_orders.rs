// src/handlers/receive_orders.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::db_utils::Pagination,
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::Visibility, tenancy::ensure_same_org},
    models::orders::CreateReceiveOrderPayload,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    pub factory_id: Option<i64>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListOrdersQuery {
    pub fn limit_offset(&self) -> (i64, i64) {
        Pagination {
            page: self.page,
            page_size: self.page_size,
        }
        .limit_offset()
    }
}

// POST /api/receive-orders
#[utoipa::path(
    post,
    path = "/api/receive-orders",
    tag = "ReceiveOrders",
    request_body = CreateReceiveOrderPayload,
    responses(
        (status = 201, description = "Retorno criado; devolve a posição da conta da facção"),
        (status = 400, description = "Processo de outra organização ou payload inválido"),
        (status = 403, description = "orgId do corpo diverge do usuário autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_receive_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateReceiveOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // anti-vazamento entre organizações: confere o orgId do corpo ANTES de
    // qualquer escrita e depois usa exclusivamente o org do usuário
    ensure_same_org(user.0.org_id, payload.org_id)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let created = app_state
        .order_service
        .create_receive_order(user.0.org_id, user.0.id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": {
                "id": created.id,
                "orderNo": created.order_no,
                "factoryStatus": created.factory_status,
            }
        })),
    ))
}

// DELETE /api/receive-orders/{id} — anulação (soft void), nunca DELETE físico
#[utoipa::path(
    delete,
    path = "/api/receive-orders/{id}",
    tag = "ReceiveOrders",
    params(("id" = i64, Path, description = "ID do retorno")),
    responses(
        (status = 200, description = "Retorno anulado; razão revertido"),
        (status = 400, description = "Pedido já anulado")
    ),
    security(("api_jwt" = []))
)]
pub async fn void_receive_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let factory_status = app_state
        .order_service
        .void_receive_order(user.0.org_id, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({
        "success": true,
        "data": { "factoryStatus": factory_status }
    })))
}

// PUT /api/receive-orders/{id}/enable — reativa um retorno anulado
#[utoipa::path(
    put,
    path = "/api/receive-orders/{id}/enable",
    tag = "ReceiveOrders",
    params(("id" = i64, Path, description = "ID do retorno")),
    responses(
        (status = 200, description = "Retorno reativado; razão reaplicado"),
        (status = 400, description = "Pedido já ativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn enable_receive_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let factory_status = app_state
        .order_service
        .enable_receive_order(user.0.org_id, id, user.0.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({
        "success": true,
        "data": { "factoryStatus": factory_status }
    })))
}

// PUT /api/receive-orders/{id} — SEMPRE 403. Editar um retorno depois de
// criado abriria espaço para o razão divergir do pedido; o caminho
// suportado é anular e recriar.
#[utoipa::path(
    put,
    path = "/api/receive-orders/{id}",
    tag = "ReceiveOrders",
    params(("id" = i64, Path, description = "ID do retorno")),
    responses(
        (status = 403, description = "Edição desabilitada por integridade de dados")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_receive_order(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Err::<axum::response::Response, _>(
        AppError::EditDisabledForDataIntegrity.to_api_error(&locale, &app_state.i18n_store),
    )
}

// GET /api/receive-orders/{id}
#[utoipa::path(
    get,
    path = "/api/receive-orders/{id}",
    tag = "ReceiveOrders",
    params(("id" = i64, Path, description = "ID do retorno")),
    responses(
        (status = 200, description = "Retorno com itens", body = crate::models::orders::ReceiveOrderDetail)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_receive_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .order_service
        .get_receive_detail(user.0.org_id, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "success": true, "data": detail })))
}

// GET /api/receive-orders
#[utoipa::path(
    get,
    path = "/api/receive-orders",
    tag = "ReceiveOrders",
    params(
        ("factoryId" = Option<i64>, Query, description = "Filtra por facção"),
        ("page" = Option<u32>, Query, description = "Página (1-based)"),
        ("pageSize" = Option<u32>, Query, description = "Tamanho da página")
    ),
    responses(
        (status = 200, description = "Lista de retornos da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_receive_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    visibility: Visibility,
    Query(query): Query<ListOrdersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (limit, offset) = query.limit_offset();

    let orders = app_state
        .order_service
        .list_receive_orders(
            visibility.org_id,
            query.factory_id,
            visibility.only_created_by,
            limit,
            offset,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "success": true, "data": orders })))
}
