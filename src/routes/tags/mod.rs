pub mod tag_handlers;
pub mod tag_models;
