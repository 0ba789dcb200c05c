use actix_web::web;

use super::attributes::attribute_handlers;
use super::comments::comment_handlers;
use super::invitations::invitation_handlers;
use super::notifications::notification_handlers;
use super::projects::project_handlers;
use super::subtasks::subtask_handlers;
use super::tags::tag_handlers;
use super::users::user_handlers;
use super::webhooks::webhook_handlers;

pub fn users_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/me", web::get().to(user_handlers::me));
    cfg.service(
        web::scope("/api/users")
            .route("", web::get().to(user_handlers::list_users))
            .route("/{id}/role", web::put().to(user_handlers::set_role))
            .route("/{id}/deactivate", web::post().to(user_handlers::deactivate))
            .route("/{id}/reactivate", web::post().to(user_handlers::reactivate)),
    );
}

pub fn projects_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/projects")
            .route("", web::get().to(project_handlers::list_projects))
            .route("", web::post().to(project_handlers::create_project))
            .route("/{id}", web::get().to(project_handlers::get_project))
            .route("/{id}", web::put().to(project_handlers::update_project))
            .route("/{id}", web::delete().to(project_handlers::delete_project))
            .route("/{id}/stage", web::put().to(project_handlers::update_stage))
            .route("/{id}/archive", web::post().to(project_handlers::archive_project))
            .route("/{id}/unarchive", web::post().to(project_handlers::unarchive_project))
            .route("/{id}/activity", web::get().to(project_handlers::list_activity))
            .route("/{id}/subtasks", web::get().to(subtask_handlers::list_subtasks))
            .route("/{id}/subtasks", web::post().to(subtask_handlers::add_subtask))
            .route("/{id}/comments", web::get().to(comment_handlers::list_comments))
            .route("/{id}/comments", web::post().to(comment_handlers::add_comment))
            .route("/{id}/tags/{tag_id}", web::post().to(tag_handlers::assign_tag))
            .route("/{id}/tags/{tag_id}", web::delete().to(tag_handlers::unassign_tag))
            .route("/{id}/attributes", web::get().to(attribute_handlers::list_attributes))
            .route("/{id}/attributes", web::post().to(attribute_handlers::add_attribute)),
    );
}

pub fn subtasks_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/subtasks")
            .route("/{id}", web::put().to(subtask_handlers::update_subtask))
            .route("/{id}", web::delete().to(subtask_handlers::delete_subtask)),
    );
}

pub fn comments_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/comments")
            .route("/{id}", web::put().to(comment_handlers::update_comment))
            .route("/{id}", web::delete().to(comment_handlers::delete_comment)),
    );
}

pub fn tags_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tags")
            .route("", web::get().to(tag_handlers::list_tags))
            .route("", web::post().to(tag_handlers::add_tag))
            .route("/{id}", web::delete().to(tag_handlers::delete_tag)),
    );
}

pub fn attributes_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/attributes")
            .route("/{id}", web::delete().to(attribute_handlers::delete_attribute)),
    );
}

pub fn notifications_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notifications")
            .route("", web::get().to(notification_handlers::list_notifications))
            .route("/read-all", web::post().to(notification_handlers::read_all))
            .route("/{id}/read", web::post().to(notification_handlers::mark_read)),
    );
}

pub fn invitations_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/invitations")
            .route("", web::get().to(invitation_handlers::list_invitations))
            .route("", web::post().to(invitation_handlers::create_invitation))
            .route("/accept", web::post().to(invitation_handlers::accept_invitation))
            .route("/{id}/revoke", web::post().to(invitation_handlers::revoke_invitation)),
    );
}

pub fn webhooks_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/webhooks")
            .route("/identity", web::post().to(webhook_handlers::identity_webhook)),
    );
}
