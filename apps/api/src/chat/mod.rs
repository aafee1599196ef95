pub mod handlers;
pub mod log;
pub mod respond;
