use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use sqlx::PgPool;

use super::subtask_models::{AddSubtaskRequest, DeleteSubtaskResponse, UpdateSubtaskRequest};
use crate::auth::authenticate;
use crate::error::ApiError;
use crate::fanout;
use crate::models::subtask::Subtask;
use crate::policy;
use crate::routes::projects::project_handlers::fetch_project;

async fn fetch_subtask(pool: &PgPool, subtask_id: i32) -> Result<Subtask, ApiError> {
    sqlx::query_as::<_, Subtask>("SELECT * FROM subtasks WHERE subtask_id = $1")
        .bind(subtask_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("subtask"))
}

/// Project progress when subtasks exist: completed over total, floored.
pub(crate) fn progress_for(done: i64, total: i64) -> i16 {
    if total == 0 {
        0
    } else {
        (done * 100 / total) as i16
    }
}

/// Recompute the parent project's progress from its subtasks. A project
/// with no subtasks keeps whatever progress was set manually.
pub(crate) async fn recompute_progress(pool: &PgPool, project_id: i32) -> Result<(), ApiError> {
    let (done, total) = sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(*) FILTER (WHERE is_done), COUNT(*) FROM subtasks WHERE project_id = $1",
    )
    .bind(project_id)
    .fetch_one(pool)
    .await?;

    if total > 0 {
        sqlx::query("UPDATE projects SET progress = $2, updated_at = NOW() WHERE project_id = $1")
            .bind(project_id)
            .bind(progress_for(done, total))
            .execute(pool)
            .await?;
    }
    Ok(())
}

// Handler to list the subtasks of a project
pub async fn list_subtasks(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    authenticate(pool.get_ref(), &req).await?;
    let project_id = path.into_inner();
    fetch_project(pool.get_ref(), project_id).await?;

    let subtasks = sqlx::query_as::<_, Subtask>(
        "SELECT * FROM subtasks WHERE project_id = $1 ORDER BY position, subtask_id",
    )
    .bind(project_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(subtasks))
}

// Handler to add a subtask
pub async fn add_subtask(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<AddSubtaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    let project_id = path.into_inner();
    let project = fetch_project(pool.get_ref(), project_id).await?;

    let is_owner = project.owner_id == Some(user.user_id);
    policy::ensure(policy::can_update_project(user.role, is_owner), "update projects")?;

    let title = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    let subtask = sqlx::query_as::<_, Subtask>(
        "INSERT INTO subtasks (project_id, title, position)
         VALUES ($1, $2, COALESCE($3::int4, (SELECT COALESCE(MAX(position), 0) + 1 FROM subtasks WHERE project_id = $1)))
         RETURNING *",
    )
    .bind(project_id)
    .bind(title)
    .bind(request.position)
    .fetch_one(pool.get_ref())
    .await?;

    recompute_progress(pool.get_ref(), project_id).await?;
    fanout::record_activity(
        pool.get_ref(),
        project_id,
        user.user_id,
        "subtask_added",
        &subtask.title,
    )
    .await;

    Ok(HttpResponse::Created().json(subtask))
}

// Handler to update a subtask (title, done flag, position)
pub async fn update_subtask(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<UpdateSubtaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    let subtask = fetch_subtask(pool.get_ref(), path.into_inner()).await?;
    let project = fetch_project(pool.get_ref(), subtask.project_id).await?;

    let is_owner = project.owner_id == Some(user.user_id);
    policy::ensure(policy::can_update_project(user.role, is_owner), "update projects")?;

    if let Some(title) = &request.title {
        if title.trim().is_empty() {
            return Err(ApiError::BadRequest("title must not be empty".to_string()));
        }
    }

    let updated = sqlx::query_as::<_, Subtask>(
        "UPDATE subtasks
         SET title = COALESCE($2, title),
             is_done = COALESCE($3, is_done),
             position = COALESCE($4, position)
         WHERE subtask_id = $1
         RETURNING *",
    )
    .bind(subtask.subtask_id)
    .bind(request.title.as_deref().map(str::trim))
    .bind(request.is_done)
    .bind(request.position)
    .fetch_one(pool.get_ref())
    .await?;

    if request.is_done.is_some() && updated.is_done != subtask.is_done {
        recompute_progress(pool.get_ref(), subtask.project_id).await?;
        fanout::record_activity(
            pool.get_ref(),
            subtask.project_id,
            user.user_id,
            if updated.is_done { "subtask_done" } else { "subtask_reopened" },
            &updated.title,
        )
        .await;
    }

    Ok(HttpResponse::Ok().json(updated))
}

// Handler to delete a subtask
pub async fn delete_subtask(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    let subtask = fetch_subtask(pool.get_ref(), path.into_inner()).await?;
    let project = fetch_project(pool.get_ref(), subtask.project_id).await?;

    let is_owner = project.owner_id == Some(user.user_id);
    policy::ensure(policy::can_update_project(user.role, is_owner), "update projects")?;

    sqlx::query("DELETE FROM subtasks WHERE subtask_id = $1")
        .bind(subtask.subtask_id)
        .execute(pool.get_ref())
        .await?;

    recompute_progress(pool.get_ref(), subtask.project_id).await?;
    info!("Subtask {} deleted from project {}", subtask.subtask_id, subtask.project_id);
    fanout::record_activity(
        pool.get_ref(),
        subtask.project_id,
        user.user_id,
        "subtask_removed",
        &subtask.title,
    )
    .await;

    Ok(HttpResponse::Ok().json(DeleteSubtaskResponse {
        success: true,
        message: "Subtask deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::progress_for;

    #[test]
    fn progress_is_done_over_total() {
        assert_eq!(progress_for(0, 4), 0);
        assert_eq!(progress_for(1, 4), 25);
        assert_eq!(progress_for(2, 3), 66);
        assert_eq!(progress_for(3, 3), 100);
    }

    #[test]
    fn empty_checklist_reports_zero() {
        assert_eq!(progress_for(0, 0), 0);
    }
}
