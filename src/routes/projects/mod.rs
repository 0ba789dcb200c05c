pub mod project_handlers;
pub mod project_models;
