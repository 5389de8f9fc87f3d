// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, models::auth::User};

// Visibilidade de listagens: o papel "especialista" (role 4) só enxerga os
// registros criados por ele; super admin e os demais papéis enxergam a
// organização inteira. Os handlers de listagem consomem este extrator e
// repassam only_created_by como filtro adicional para o repositório.
#[derive(Debug, Clone, Copy)]
pub struct Visibility {
    pub org_id: i64,
    pub only_created_by: Option<i64>,
}

impl<S> FromRequestParts<S> for Visibility
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .ok_or(AppError::InvalidToken)?;

        Ok(Visibility {
            org_id: user.org_id,
            only_created_by: user.created_by_filter(),
        })
    }
}
