// src/models/mod.rs

pub mod activity;
pub mod comment;
pub mod custom_attribute;
pub mod invitation;
pub mod notification;
pub mod project;
pub mod subtask;
pub mod tag;
pub mod user;
