// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, models::auth::User};

// O escopo de organização de TODA query do núcleo. Deriva exclusivamente
// do usuário autenticado — nunca de um orgId vindo no corpo ou na query.
#[derive(Debug, Clone, Copy)]
pub struct OrgScope(pub i64);

impl<S> FromRequestParts<S> for OrgScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .map(|user| OrgScope(user.org_id))
            .ok_or(AppError::InvalidToken)
    }
}

// Clientes antigos ainda mandam orgId no corpo. A regra é: se veio e
// diverge do usuário autenticado, 403; se bate (ou não veio), o valor do
// corpo é descartado e o org_id autenticado é usado em tudo.
pub fn ensure_same_org(user_org_id: i64, body_org_id: Option<i64>) -> Result<(), AppError> {
    match body_org_id {
        Some(claimed) if claimed != user_org_id => Err(AppError::CrossOrgAccessDenied),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn org_divergente_e_rejeitada() {
        let err = ensure_same_org(1, Some(2));
        assert!(matches!(err, Err(AppError::CrossOrgAccessDenied)));
    }

    #[test]
    fn org_igual_ou_ausente_passa() {
        assert!(ensure_same_org(1, Some(1)).is_ok());
        assert!(ensure_same_org(1, None).is_ok());
    }
}
