// src/common/i18n.rs

use std::collections::HashMap;

// Catálogo de mensagens de erro por idioma. Carregado uma vez no AppState
// e consultado por AppError::to_api_error com o Locale do request.
#[derive(Debug, Clone)]
pub struct I18nStore {
    // Chave composta "idioma.CODIGO" -> mensagem.
    messages: HashMap<String, &'static str>,
}

const CATALOG: &[(&str, &str, &str)] = &[
    // (idioma, código, mensagem)
    ("pt", "VALIDATION_ERROR", "Um ou mais campos são inválidos."),
    ("en", "VALIDATION_ERROR", "One or more fields are invalid."),
    ("pt", "INVALID_CREDENTIALS", "Usuário ou senha inválidos."),
    ("en", "INVALID_CREDENTIALS", "Invalid username or password."),
    ("pt", "INVALID_TOKEN", "Token de autenticação inválido ou ausente."),
    ("en", "INVALID_TOKEN", "Missing or invalid authentication token."),
    ("pt", "USER_NOT_FOUND", "Usuário não encontrado."),
    ("en", "USER_NOT_FOUND", "User not found."),
    ("pt", "CROSS_ORG_ACCESS_DENIED", "Acesso a dados de outra organização negado."),
    ("en", "CROSS_ORG_ACCESS_DENIED", "Access to another organization's data denied."),
    (
        "pt",
        "EDIT_DISABLED_FOR_DATA_INTEGRITY",
        "Retornos não podem ser editados; anule o pedido e crie um novo.",
    ),
    (
        "en",
        "EDIT_DISABLED_FOR_DATA_INTEGRITY",
        "Receive orders cannot be edited; void the order and create a new one.",
    ),
    ("pt", "FACTORY_NOT_FOUND", "Facção não encontrada nesta organização."),
    ("en", "FACTORY_NOT_FOUND", "Factory not found in this organization."),
    ("pt", "PROCESS_NOT_FOUND", "Processo não pertence a esta organização."),
    ("en", "PROCESS_NOT_FOUND", "Process does not belong to this organization."),
    ("pt", "ORDER_NOT_FOUND", "Pedido não encontrado nesta organização."),
    ("en", "ORDER_NOT_FOUND", "Order not found in this organization."),
    ("pt", "PAYMENT_NOT_FOUND", "Pagamento não encontrado nesta organização."),
    ("en", "PAYMENT_NOT_FOUND", "Payment not found in this organization."),
    ("pt", "ORDER_ALREADY_VOIDED", "O pedido já está anulado."),
    ("en", "ORDER_ALREADY_VOIDED", "The order is already voided."),
    ("pt", "ORDER_ALREADY_ACTIVE", "O pedido já está ativo."),
    ("en", "ORDER_ALREADY_ACTIVE", "The order is already active."),
    ("pt", "PAYMENT_ALREADY_VOIDED", "O pagamento já está anulado."),
    ("en", "PAYMENT_ALREADY_VOIDED", "The payment is already voided."),
    ("pt", "INVALID_DATE_RANGE", "Intervalo de datas inválido."),
    ("en", "INVALID_DATE_RANGE", "Invalid date range."),
    ("pt", "DATABASE_ERROR", "Ocorreu um erro inesperado."),
    ("en", "DATABASE_ERROR", "An unexpected error occurred."),
    ("pt", "INTERNAL_ERROR", "Ocorreu um erro inesperado."),
    ("en", "INTERNAL_ERROR", "An unexpected error occurred."),
];

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        for (lang, code, msg) in CATALOG {
            messages.insert(format!("{lang}.{code}"), *msg);
        }
        Self { messages }
    }

    // Cai para "pt" (idioma padrão do produto) quando o idioma pedido
    // não tem tradução para o código.
    pub fn message(&self, lang: &str, code: &str) -> Option<&str> {
        self.messages
            .get(&format!("{lang}.{code}"))
            .or_else(|| self.messages.get(&format!("pt.{code}")))
            .copied()
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_mensagem_no_idioma_pedido() {
        let store = I18nStore::new();
        assert_eq!(
            store.message("en", "CROSS_ORG_ACCESS_DENIED"),
            Some("Access to another organization's data denied.")
        );
    }

    #[test]
    fn idioma_desconhecido_cai_para_portugues() {
        let store = I18nStore::new();
        assert_eq!(
            store.message("de", "FACTORY_NOT_FOUND"),
            Some("Facção não encontrada nesta organização.")
        );
    }
}
