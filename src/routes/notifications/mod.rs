pub mod notification_handlers;
pub mod notification_models;
