//! Activity-log and notification fan-out after a committed mutation.
//! A fan-out failure must never fail the request that already committed;
//! it is logged with the project id and swallowed.

use log::error;
use sqlx::PgPool;

use crate::models::notification::NotificationKind;

pub async fn record_activity(pool: &PgPool, project_id: i32, actor_id: i32, action: &str, detail: &str) {
    let result = sqlx::query(
        "INSERT INTO activity_log (project_id, actor_id, action, detail) VALUES ($1, $2, $3, $4)",
    )
    .bind(project_id)
    .bind(actor_id)
    .bind(action)
    .bind(detail)
    .execute(pool)
    .await;

    if let Err(e) = result {
        error!("Failed to record activity for project {}: {}", project_id, e);
    }
}

pub async fn notify(
    pool: &PgPool,
    user_id: i32,
    kind: NotificationKind,
    body: &str,
    project_id: Option<i32>,
) {
    let result = sqlx::query(
        "INSERT INTO notifications (user_id, kind, body, project_id) VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(body)
    .bind(project_id)
    .execute(pool)
    .await;

    if let Err(e) = result {
        error!("Failed to notify user {} ({}): {}", user_id, kind.as_str(), e);
    }
}
