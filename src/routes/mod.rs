// src/routes/mod.rs

pub mod attributes;
pub mod comments;
pub mod invitations;
pub mod notifications;
pub mod projects;
pub mod routes;
pub mod subtasks;
pub mod tags;
pub mod users;
pub mod webhooks;
