pub mod attribute_handlers;
pub mod attribute_models;
