pub mod auth;
pub mod factory_service;
pub mod ledger;
pub mod order_service;
pub mod payment_service;
pub mod statement_service;

pub use auth::AuthService;
pub use factory_service::FactoryService;
pub use order_service::OrderService;
pub use payment_service::PaymentService;
pub use statement_service::StatementService;
