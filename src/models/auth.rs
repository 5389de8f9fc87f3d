// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Papel "especialista": só enxerga os registros que ele mesmo criou.
pub const ROLE_SPECIALIST: i32 = 4;

// Representa um usuário vindo do banco de dados.
// Todas as queries do núcleo são escopadas pelo org_id DESTE usuário,
// nunca pelo orgId que chega no corpo da requisição.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub org_id: i64,
    pub username: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role_id: i32,
    pub is_super_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    // O especialista (role 4) não enxerga registros de colegas.
    pub fn created_by_filter(&self) -> Option<i64> {
        if !self.is_super_admin && self.role_id == ROLE_SPECIALIST {
            Some(self.id)
        } else {
            None
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "O usuário é obrigatório."))]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,   // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role_id: i32, is_super_admin: bool) -> User {
        User {
            id: 7,
            org_id: 1,
            username: "ana".into(),
            password_hash: String::new(),
            role_id,
            is_super_admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn especialista_so_enxerga_os_proprios_registros() {
        assert_eq!(user(ROLE_SPECIALIST, false).created_by_filter(), Some(7));
    }

    #[test]
    fn demais_papeis_enxergam_a_organizacao_inteira() {
        assert_eq!(user(2, false).created_by_filter(), None);
        // super admin ignora a restrição mesmo com role 4
        assert_eq!(user(ROLE_SPECIALIST, true).created_by_filter(), None);
    }
}
