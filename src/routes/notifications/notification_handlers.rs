use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;

use super::notification_models::{ListNotificationsQuery, MarkReadResponse, ReadAllResponse};
use crate::auth::authenticate;
use crate::error::ApiError;
use crate::models::notification::Notification;

// Handler to list the caller's notifications, newest first
pub async fn list_notifications(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    query: web::Query<ListNotificationsQuery>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;

    let notifications = sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications
         WHERE user_id = $1 AND (NOT $2::bool OR NOT is_read)
         ORDER BY created_at DESC",
    )
    .bind(user.user_id)
    .bind(query.unread_only.unwrap_or(false))
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(notifications))
}

// Handler to mark one of the caller's notifications read. Another user's
// notification id is a 404, not a 403, so ids cannot be probed.
pub async fn mark_read(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;

    let updated = sqlx::query_scalar::<_, i32>(
        "UPDATE notifications SET is_read = TRUE
         WHERE notification_id = $1 AND user_id = $2
         RETURNING notification_id",
    )
    .bind(path.into_inner())
    .bind(user.user_id)
    .fetch_optional(pool.get_ref())
    .await?;

    if updated.is_none() {
        return Err(ApiError::NotFound("notification"));
    }
    Ok(HttpResponse::Ok().json(MarkReadResponse {
        success: true,
        message: "Notification marked read".to_string(),
    }))
}

// Handler to mark everything read for the caller
pub async fn read_all(pool: web::Data<PgPool>, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;

    let result = sqlx::query(
        "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND NOT is_read",
    )
    .bind(user.user_id)
    .execute(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(ReadAllResponse { marked: result.rows_affected() }))
}
