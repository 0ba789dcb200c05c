use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use sqlx::PgPool;

use super::comment_models::{
    AddCommentRequest, CommentView, DeleteCommentResponse, UpdateCommentRequest,
};
use crate::auth::authenticate;
use crate::error::ApiError;
use crate::fanout;
use crate::models::comment::Comment;
use crate::models::notification::NotificationKind;
use crate::policy;
use crate::routes::projects::project_handlers::fetch_project;

async fn fetch_comment(pool: &PgPool, comment_id: i32) -> Result<Comment, ApiError> {
    sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE comment_id = $1")
        .bind(comment_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("comment"))
}

// Handler to list the comments of a project, oldest first
pub async fn list_comments(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    authenticate(pool.get_ref(), &req).await?;
    let project_id = path.into_inner();
    fetch_project(pool.get_ref(), project_id).await?;

    let comments = sqlx::query_as::<_, CommentView>(
        "SELECT c.comment_id, c.project_id, c.author_id, u.user_name AS author_name,
                c.body, c.created_at, c.updated_at
         FROM comments c
         JOIN users u ON u.user_id = c.author_id
         WHERE c.project_id = $1
         ORDER BY c.created_at",
    )
    .bind(project_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(comments))
}

// Handler to add a comment. The project owner is notified unless they are
// the author.
pub async fn add_comment(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<AddCommentRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    let project_id = path.into_inner();
    let project = fetch_project(pool.get_ref(), project_id).await?;

    let body = request.body.trim();
    if body.is_empty() {
        return Err(ApiError::BadRequest("comment body must not be empty".to_string()));
    }

    let comment = sqlx::query_as::<_, Comment>(
        "INSERT INTO comments (project_id, author_id, body) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(project_id)
    .bind(user.user_id)
    .bind(body)
    .fetch_one(pool.get_ref())
    .await?;

    fanout::record_activity(pool.get_ref(), project_id, user.user_id, "commented", "").await;
    if let Some(owner_id) = project.owner_id {
        if owner_id != user.user_id {
            fanout::notify(
                pool.get_ref(),
                owner_id,
                NotificationKind::Commented,
                &format!("{} commented on \"{}\"", user.user_name, project.title),
                Some(project_id),
            )
            .await;
        }
    }

    Ok(HttpResponse::Created().json(comment))
}

// Handler to edit a comment (author or admin)
pub async fn update_comment(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    let comment = fetch_comment(pool.get_ref(), path.into_inner()).await?;

    let is_author = comment.author_id == user.user_id;
    policy::ensure(policy::can_edit_comment(user.role, is_author), "edit this comment")?;

    let body = request.body.trim();
    if body.is_empty() {
        return Err(ApiError::BadRequest("comment body must not be empty".to_string()));
    }

    let updated = sqlx::query_as::<_, Comment>(
        "UPDATE comments SET body = $2, updated_at = NOW() WHERE comment_id = $1 RETURNING *",
    )
    .bind(comment.comment_id)
    .bind(body)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

// Handler to delete a comment (author or admin)
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    let comment = fetch_comment(pool.get_ref(), path.into_inner()).await?;

    let is_author = comment.author_id == user.user_id;
    policy::ensure(policy::can_edit_comment(user.role, is_author), "delete this comment")?;

    sqlx::query("DELETE FROM comments WHERE comment_id = $1")
        .bind(comment.comment_id)
        .execute(pool.get_ref())
        .await?;

    info!("Comment {} deleted by user {}", comment.comment_id, user.user_id);
    Ok(HttpResponse::Ok().json(DeleteCommentResponse {
        success: true,
        message: "Comment deleted successfully".to_string(),
    }))
}
