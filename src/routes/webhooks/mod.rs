pub mod signature;
pub mod webhook_handlers;
pub mod webhook_models;
