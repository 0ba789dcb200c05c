pub mod subtask_handlers;
pub mod subtask_models;
