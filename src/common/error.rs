// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro de domínio, com `thiserror` para melhor ergonomia.
// Cada variante carrega um `code` estável (máquina) além da mensagem (humano).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // O orgId do corpo diverge do orgId do usuário autenticado.
    #[error("Acesso entre organizações negado")]
    CrossOrgAccessDenied,

    // Retornos são imutáveis após a criação: só anular e recriar.
    #[error("Edição desabilitada para preservar a integridade do razão")]
    EditDisabledForDataIntegrity,

    #[error("Facção não encontrada nesta organização")]
    FactoryNotFound,

    #[error("Processo não pertence a esta organização")]
    ProcessNotFound,

    #[error("Pedido não encontrado nesta organização")]
    OrderNotFound,

    #[error("Pagamento não encontrado nesta organização")]
    PaymentNotFound,

    #[error("O pedido já está anulado")]
    OrderAlreadyVoided,

    #[error("O pedido já está ativo")]
    OrderAlreadyActive,

    #[error("O pagamento já está anulado")]
    PaymentAlreadyVoided,

    #[error("Intervalo de datas inválido")]
    InvalidDateRange,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    // Código estável exposto no envelope de erro (o cliente faz match nele).
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::CrossOrgAccessDenied => "CROSS_ORG_ACCESS_DENIED",
            AppError::EditDisabledForDataIntegrity => "EDIT_DISABLED_FOR_DATA_INTEGRITY",
            AppError::FactoryNotFound => "FACTORY_NOT_FOUND",
            AppError::ProcessNotFound => "PROCESS_NOT_FOUND",
            AppError::OrderNotFound => "ORDER_NOT_FOUND",
            AppError::PaymentNotFound => "PAYMENT_NOT_FOUND",
            AppError::OrderAlreadyVoided => "ORDER_ALREADY_VOIDED",
            AppError::OrderAlreadyActive => "ORDER_ALREADY_ACTIVE",
            AppError::PaymentAlreadyVoided => "PAYMENT_ALREADY_VOIDED",
            AppError::InvalidDateRange => "INVALID_DATE_RANGE",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_ERROR",
            AppError::BcryptError(_) => "INTERNAL_ERROR",
            AppError::JwtError(_) => "INVALID_TOKEN",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ProcessNotFound => StatusCode::BAD_REQUEST,
            AppError::OrderAlreadyVoided => StatusCode::BAD_REQUEST,
            AppError::OrderAlreadyActive => StatusCode::BAD_REQUEST,
            AppError::PaymentAlreadyVoided => StatusCode::BAD_REQUEST,
            AppError::InvalidDateRange => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::CrossOrgAccessDenied => StatusCode::FORBIDDEN,
            AppError::EditDisabledForDataIntegrity => StatusCode::FORBIDDEN,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::FactoryNotFound => StatusCode::NOT_FOUND,
            AppError::OrderNotFound => StatusCode::NOT_FOUND,
            AppError::PaymentNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Converte o erro de domínio para a resposta HTTP, escolhendo a mensagem
    // no idioma do cliente. Erros 5xx são logados aqui com o contexto completo.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Erro interno do servidor: {:?}", self);
        }

        // Validação devolve todos os detalhes por campo.
        let details = if let AppError::ValidationError(errors) = self {
            let mut map = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                map.insert(field.to_string(), messages);
            }
            Some(json!(map))
        } else {
            None
        };

        let message = store
            .message(&locale.0, self.code())
            .map(str::to_owned)
            .unwrap_or_else(|| self.to_string());

        ApiError {
            status,
            code: self.code().to_string(),
            message,
            details,
        }
    }
}

// Erro já "pronto para o fio": status + código + mensagem localizada.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "code": self.code,
            "error": self.message,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

// Fallback para quem retorna AppError direto (middlewares e extratores):
// sem Locale disponível, usamos a mensagem padrão da variante.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Erro interno do servidor: {:?}", self);
        }
        let body = json!({
            "success": false,
            "code": self.code(),
            "error": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
