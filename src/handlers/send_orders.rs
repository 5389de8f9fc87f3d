// src/handlers/send_orders.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::receive_orders::ListOrdersQuery,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::Visibility, tenancy::ensure_same_org},
    models::orders::CreateSendOrderPayload,
};

// POST /api/send-orders
#[utoipa::path(
    post,
    path = "/api/send-orders",
    tag = "SendOrders",
    request_body = CreateSendOrderPayload,
    responses(
        (status = 201, description = "Remessa criada"),
        (status = 400, description = "Processo de outra organização ou payload inválido"),
        (status = 403, description = "orgId do corpo diverge do usuário autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_send_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateSendOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_same_org(user.0.org_id, payload.org_id)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let created = app_state
        .order_service
        .create_send_order(user.0.org_id, user.0.id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": { "id": created.id, "orderNo": created.order_no }
        })),
    ))
}

// DELETE /api/send-orders/{id} — anulação; remessa não mexe no razão
#[utoipa::path(
    delete,
    path = "/api/send-orders/{id}",
    tag = "SendOrders",
    params(("id" = i64, Path, description = "ID da remessa")),
    responses(
        (status = 200, description = "Remessa anulada"),
        (status = 400, description = "Pedido já anulado")
    ),
    security(("api_jwt" = []))
)]
pub async fn void_send_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .order_service
        .void_send_order(user.0.org_id, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "success": true })))
}

// PUT /api/send-orders/{id}/enable
#[utoipa::path(
    put,
    path = "/api/send-orders/{id}/enable",
    tag = "SendOrders",
    params(("id" = i64, Path, description = "ID da remessa")),
    responses(
        (status = 200, description = "Remessa reativada"),
        (status = 400, description = "Pedido já ativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn enable_send_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .order_service
        .enable_send_order(user.0.org_id, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "success": true })))
}

// GET /api/send-orders/{id}
#[utoipa::path(
    get,
    path = "/api/send-orders/{id}",
    tag = "SendOrders",
    params(("id" = i64, Path, description = "ID da remessa")),
    responses(
        (status = 200, description = "Remessa com itens", body = crate::models::orders::SendOrderDetail)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_send_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .order_service
        .get_send_detail(user.0.org_id, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "success": true, "data": detail })))
}

// GET /api/send-orders
#[utoipa::path(
    get,
    path = "/api/send-orders",
    tag = "SendOrders",
    params(
        ("factoryId" = Option<i64>, Query, description = "Filtra por facção"),
        ("page" = Option<u32>, Query, description = "Página (1-based)"),
        ("pageSize" = Option<u32>, Query, description = "Tamanho da página")
    ),
    responses(
        (status = 200, description = "Lista de remessas da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_send_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    visibility: Visibility,
    Query(query): Query<ListOrdersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (limit, offset) = query.limit_offset();

    let orders = app_state
        .order_service
        .list_send_orders(
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
