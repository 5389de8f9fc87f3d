pub mod auth;
pub mod factories;
pub mod receive_orders;
pub mod send_orders;
pub mod statement;
