pub mod auth;
pub mod factory;
pub mod orders;
pub mod payment;
pub mod statement;
