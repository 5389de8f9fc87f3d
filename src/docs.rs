// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Facções ---
        handlers::factories::create_factory,
        handlers::factories::list_factories,
        handlers::factories::get_factory_account,

        // --- Pagamentos ---
        handlers::factories::create_factory_payment,
        handlers::factories::void_factory_payment,
        handlers::factories::list_factory_payments,

        // --- Remessas ---
        handlers::send_orders::create_send_order,
        handlers::send_orders::void_send_order,
        handlers::send_orders::enable_send_order,
        handlers::send_orders::get_send_order,
        handlers::send_orders::list_send_orders,

        // --- Retornos ---
        handlers::receive_orders::create_receive_order,
        handlers::receive_orders::void_receive_order,
        handlers::receive_orders::enable_receive_order,
        handlers::receive_orders::update_receive_order,
        handlers::receive_orders::get_receive_order,
        handlers::receive_orders::list_receive_orders,

        // --- Extrato ---
        handlers::statement::get_statement,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Facções ---
            models::factory::Factory,
            models::factory::FactoryStatus,
            models::factory::CreateFactoryPayload,

            // --- Pedidos ---
            models::orders::SendOrder,
            models::orders::SendOrderItem,
            models::orders::SendOrderDetail,
            models::orders::ReceiveOrder,
            models::orders::ReceiveOrderItem,
            models::orders::ReceiveOrderDetail,
            models::orders::CreateSendOrderPayload,
            models::orders::SendItemPayload,
            models::orders::CreateReceiveOrderPayload,
            models::orders::ReceiveItemPayload,

            // --- Pagamentos ---
            models::payment::PaymentRecord,
            models::payment::CreatePaymentPayload,
            models::payment::PaymentReceipt,

            // --- Extrato ---
            models::statement::StatementQuery,
            models::statement::StatementReport,
            models::statement::StyleSummary,
            models::statement::ProcessComparison,
            models::statement::StatementOrder,

            // --- Payloads de listagem ---
            handlers::receive_orders::ListOrdersQuery,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Dados do usuário autenticado"),
        (name = "Factories", description = "Facções e suas contas correntes"),
        (name = "Payments", description = "Pagamentos diretos às facções"),
        (name = "SendOrders", description = "Remessas de mercadoria para beneficiamento"),
        (name = "ReceiveOrders", description = "Retornos de mercadoria beneficiada"),
        (name = "Statement", description = "Extrato de conferência por facção")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
