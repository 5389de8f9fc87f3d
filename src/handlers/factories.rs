// src/handlers/factories.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::{
    common::db_utils::Pagination,
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::Visibility,
        tenancy::{ensure_same_org, OrgScope},
    },
    models::factory::CreateFactoryPayload,
    models::payment::CreatePaymentPayload,
};

// POST /api/factories
#[utoipa::path(
    post,
    path = "/api/factories",
    tag = "Factories",
    request_body = CreateFactoryPayload,
    responses(
        (status = 201, description = "Facção criada com conta zerada", body = crate::models::factory::Factory),
        (status = 403, description = "orgId do corpo diverge do usuário autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_factory(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateFactoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_same_org(user.0.org_id, payload.org_id)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let factory = app_state
        .factory_service
        .create_factory(user.0.org_id, user.0.id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": factory })),
    ))
}

// GET /api/factories
#[utoipa::path(
    get,
    path = "/api/factories",
    tag = "Factories",
    params(
        ("page" = Option<u32>, Query, description = "Página (1-based)"),
        ("pageSize" = Option<u32>, Query, description = "Tamanho da página")
    ),
    responses((status = 200, description = "Facções da organização")),
    security(("api_jwt" = []))
)]
pub async fn list_factories(
    State(app_state): State<AppState>,
    locale: Locale,
    visibility: Visibility,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let (limit, offset) = pagination.limit_offset();

    let factories = app_state
        .factory_service
        .list_factories(visibility.org_id, visibility.only_created_by, limit, offset)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "success": true, "data": factories })))
}

// GET /api/factories/{id}/account — a posição atual (balance/debt)
#[utoipa::path(
    get,
    path = "/api/factories/{id}/account",
    tag = "Factories",
    params(("id" = i64, Path, description = "ID da facção")),
    responses(
        (status = 200, description = "Posição da conta", body = crate::models::factory::FactoryStatus),
        (status = 404, description = "Facção não encontrada nesta organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_factory_account(
    State(app_state): State<AppState>,
    locale: Locale,
    OrgScope(org_id): OrgScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let account = app_state
        .factory_service
        .get_account(org_id, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "success": true, "data": account })))
}

// POST /api/factories/{id}/payments — pagamento direto à facção
#[utoipa::path(
    post,
    path = "/api/factories/{id}/payments",
    tag = "Payments",
    request_body = CreatePaymentPayload,
    params(("id" = i64, Path, description = "ID da facção")),
    responses(
        (status = 201, description = "Pagamento lançado", body = crate::models::payment::PaymentReceipt),
        (status = 404, description = "Facção não encontrada nesta organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_factory_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let receipt = app_state
        .payment_service
        .record_direct_payment(user.0.org_id, id, user.0.id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": receipt })),
    ))
}

// PUT /api/factories/{factory_id}/payments/{payment_id}/void
#[utoipa::path(
    put,
    path = "/api/factories/{factory_id}/payments/{payment_id}/void",
    tag = "Payments",
    params(
        ("factory_id" = i64, Path, description = "ID da facção"),
        ("payment_id" = i64, Path, description = "ID do pagamento")
    ),
    responses(
        (status = 200, description = "Pagamento anulado; razão revertido"),
        (status = 400, description = "Pagamento já anulado")
    ),
    security(("api_jwt" = []))
)]
pub async fn void_factory_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path((factory_id, payment_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let factory_status = app_state
        .payment_service
        .void_direct_payment(user.0.org_id, factory_id, payment_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({
        "success": true,
        "data": { "factoryStatus": factory_status }
    })))
}

// GET /api/factories/{id}/payments
#[utoipa::path(
    get,
    path = "/api/factories/{id}/payments",
    tag = "Payments",
    params(
        ("id" = i64, Path, description = "ID da facção"),
        ("page" = Option<u32>, Query, description = "Página (1-based)"),
        ("pageSize" = Option<u32>, Query, description = "Tamanho da página")
    ),
    responses((status = 200, description = "Pagamentos da facção")),
    security(("api_jwt" = []))
)]
pub async fn list_factory_payments(
    State(app_state): State<AppState>,
    locale: Locale,
    visibility: Visibility,
    Path(id): Path<i64>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let (limit, offset) = pagination.limit_offset();

    let payments = app_state
        .payment_service
        .list_payments(
            visibility.org_id,
            id,
            visibility.only_created_by,
            limit,
            offset,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "success": true, "data": payments })))
}
