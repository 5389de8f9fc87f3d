pub mod factory_repo;
pub use factory_repo::FactoryRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod sequence_repo;
pub mod statement_repo;
pub use statement_repo::StatementRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
