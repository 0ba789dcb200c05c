pub mod invitation_handlers;
pub mod invitation_models;
