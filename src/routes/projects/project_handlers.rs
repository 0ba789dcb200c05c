use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use sqlx::PgPool;

use super::project_models::{
    ArchiveResponse, CreateProjectRequest, DeleteProjectResponse, ListProjectsQuery,
    UpdateProjectRequest, UpdateStageRequest, UpdateStageResponse,
};
use crate::auth::authenticate;
use crate::error::ApiError;
use crate::fanout;
use crate::models::activity::ActivityEntry;
use crate::models::notification::NotificationKind;
use crate::models::project::{Priority, Project, Stage};
use crate::policy;

/// Load a project row or 404.
pub(crate) async fn fetch_project(pool: &PgPool, project_id: i32) -> Result<Project, ApiError> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE project_id = $1")
        .bind(project_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("project"))
}

/// Stage promotion implied by handing a project to an owner. Archived
/// projects refuse reassignment outright, matching the stage endpoint.
fn stage_after_owner_assignment(project: &Project) -> Result<Option<Stage>, ApiError> {
    if project.is_archived {
        return Err(ApiError::Unprocessable(
            "cannot reassign an archived project".to_string(),
        ));
    }
    Ok((project.stage == Stage::Unassigned).then_some(Stage::Assigned))
}

/// Look up a prospective owner; 404 if unknown, 422 if deactivated.
async fn fetch_assignable_user(pool: &PgPool, user_id: i32) -> Result<String, ApiError> {
    let row = sqlx::query_as::<_, (String, bool)>(
        "SELECT user_name, is_active FROM users WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ApiError::NotFound("user"))?;

    if !row.1 {
        return Err(ApiError::Unprocessable(
            "cannot assign a deactivated user".to_string(),
        ));
    }
    Ok(row.0)
}

// Handler to list projects with optional stage/owner/tag filters.
// Archived projects are excluded unless include_archived is set.
pub async fn list_projects(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    query: web::Query<ListProjectsQuery>,
) -> Result<HttpResponse, ApiError> {
    authenticate(pool.get_ref(), &req).await?;

    let projects = sqlx::query_as::<_, Project>(
        "SELECT p.* FROM projects p
         WHERE ($1::text IS NULL OR p.stage = $1)
           AND ($2::int4 IS NULL OR p.owner_id = $2)
           AND ($3::text IS NULL OR EXISTS (
                 SELECT 1 FROM project_tags pt
                 JOIN tags t ON t.tag_id = pt.tag_id
                 WHERE pt.project_id = p.project_id AND t.tag_name = $3))
           AND ($4::bool OR NOT p.is_archived)
         ORDER BY p.updated_at DESC",
    )
    .bind(query.stage.map(|s| s.as_str()))
    .bind(query.owner_id)
    .bind(query.tag.as_deref())
    .bind(query.include_archived.unwrap_or(false))
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(projects))
}

// Handler to get one project
pub async fn get_project(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    authenticate(pool.get_ref(), &req).await?;
    let project = fetch_project(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

// Handler to create a project. A project created with an owner starts in
// the assigned stage; claiming someone else as owner needs manager/admin.
pub async fn create_project(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    request: web::Json<CreateProjectRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;

    let title = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    let mut stage = Stage::Unassigned;
    let mut owner_name = None;
    if let Some(owner_id) = request.owner_id {
        policy::ensure(
            owner_id == user.user_id || policy::can_reassign_owner(user.role),
            "assign projects to other users",
        )?;
        owner_name = Some(fetch_assignable_user(pool.get_ref(), owner_id).await?);
        stage = Stage::Assigned;
    }

    let priority = request.priority.unwrap_or(Priority::Medium);
    let project = sqlx::query_as::<_, Project>(
        "INSERT INTO projects (title, description, stage, priority, owner_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(title)
    .bind(request.description.as_deref())
    .bind(stage.as_str())
    .bind(priority.as_str())
    .bind(request.owner_id)
    .fetch_one(pool.get_ref())
    .await?;

    info!("Project {} created by user {}", project.project_id, user.user_id);
    fanout::record_activity(
        pool.get_ref(),
        project.project_id,
        user.user_id,
        "created",
        &format!("created in stage {}", project.stage.as_str()),
    )
    .await;
    if let (Some(owner_id), Some(owner_name)) = (project.owner_id, owner_name) {
        if owner_id != user.user_id {
            info!("Assigning project {} to {}", project.project_id, owner_name);
            fanout::notify(
                pool.get_ref(),
                owner_id,
                NotificationKind::Assigned,
                &format!("You were assigned to \"{}\"", project.title),
                Some(project.project_id),
            )
            .await;
        }
    }

    Ok(HttpResponse::Created().json(project))
}

// Handler to update project fields. Owner reassignment is manager/admin
// only and moves an unassigned project to assigned.
pub async fn update_project(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<UpdateProjectRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    let project_id = path.into_inner();
    let project = fetch_project(pool.get_ref(), project_id).await?;

    let is_owner = project.owner_id == Some(user.user_id);
    policy::ensure(policy::can_update_project(user.role, is_owner), "update projects")?;
    if request.owner_id.is_some() {
        policy::ensure(policy::can_reassign_owner(user.role), "reassign project owners")?;
    }

    if let Some(progress) = request.progress {
        if !(0..=100).contains(&progress) {
            return Err(ApiError::Unprocessable(
                "progress must be between 0 and 100".to_string(),
            ));
        }
    }
    if let Some(title) = &request.title {
        if title.trim().is_empty() {
            return Err(ApiError::BadRequest("title must not be empty".to_string()));
        }
    }

    let edits_fields = request.title.is_some()
        || request.description.is_some()
        || request.priority.is_some()
        || request.progress.is_some();
    if edits_fields {
        sqlx::query(
            "UPDATE projects
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 priority = COALESCE($4, priority),
                 progress = COALESCE($5, progress),
                 updated_at = NOW()
             WHERE project_id = $1",
        )
        .bind(project_id)
        .bind(request.title.as_deref().map(str::trim))
        .bind(request.description.as_deref())
        .bind(request.priority.map(|p| p.as_str()))
        .bind(request.progress)
        .execute(pool.get_ref())
        .await?;

        fanout::record_activity(pool.get_ref(), project_id, user.user_id, "updated", "project fields updated")
            .await;
    }

    if let Some(new_owner) = request.owner_id {
        if project.owner_id != Some(new_owner) {
            let promoted = stage_after_owner_assignment(&project)?;
            let owner_name = fetch_assignable_user(pool.get_ref(), new_owner).await?;
            // One statement: an owner must never land on the row without
            // the matching stage promotion.
            sqlx::query(
                "UPDATE projects SET owner_id = $2, stage = $3, updated_at = NOW()
                 WHERE project_id = $1",
            )
            .bind(project_id)
            .bind(new_owner)
            .bind(promoted.unwrap_or(project.stage).as_str())
            .execute(pool.get_ref())
            .await?;

            fanout::record_activity(
                pool.get_ref(),
                project_id,
                user.user_id,
                "owner_changed",
                &format!("owner set to {}", owner_name),
            )
            .await;
            if new_owner != user.user_id {
                fanout::notify(
                    pool.get_ref(),
                    new_owner,
                    NotificationKind::Assigned,
                    &format!("You were assigned to \"{}\"", project.title),
                    Some(project_id),
                )
                .await;
            }
        }
    }

    let updated = fetch_project(pool.get_ref(), project_id).await?;
    Ok(HttpResponse::Ok().json(updated))
}

// Handler to move a project through the pipeline. Transitions are checked
// against the stage table; re-sending the current stage is a no-op so a
// retried request cannot duplicate activity or notifications.
pub async fn update_stage(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<UpdateStageRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    let project_id = path.into_inner();
    let project = fetch_project(pool.get_ref(), project_id).await?;

    let is_owner = project.owner_id == Some(user.user_id);
    policy::ensure(policy::can_update_project(user.role, is_owner), "update projects")?;

    if project.is_archived {
        return Err(ApiError::Unprocessable(
            "cannot change the stage of an archived project".to_string(),
        ));
    }

    let next = request.stage;
    if next == project.stage {
        info!("Project {} already in stage {}", project_id, next.as_str());
        return Ok(HttpResponse::Ok().json(UpdateStageResponse { changed: false, stage: next }));
    }
    if project.stage.is_terminal() {
        return Err(ApiError::Unprocessable(format!(
            "project is closed ({})",
            project.stage.as_str()
        )));
    }
    if next == Stage::Assigned && project.owner_id.is_none() {
        return Err(ApiError::Unprocessable(
            "cannot move a project without an owner to assigned".to_string(),
        ));
    }
    if !project.stage.can_transition_to(next) {
        return Err(ApiError::Unprocessable(format!(
            "illegal stage transition: {} -> {}",
            project.stage.as_str(),
            next.as_str()
        )));
    }

    sqlx::query("UPDATE projects SET stage = $2, updated_at = NOW() WHERE project_id = $1")
        .bind(project_id)
        .bind(next.as_str())
        .execute(pool.get_ref())
        .await?;

    info!(
        "Project {} moved {} -> {} by user {}",
        project_id,
        project.stage.as_str(),
        next.as_str(),
        user.user_id
    );
    fanout::record_activity(
        pool.get_ref(),
        project_id,
        user.user_id,
        "stage_changed",
        &format!("{} -> {}", project.stage.as_str(), next.as_str()),
    )
    .await;
    if let Some(owner_id) = project.owner_id {
        if owner_id != user.user_id {
            fanout::notify(
                pool.get_ref(),
                owner_id,
                NotificationKind::StageChanged,
                &format!("\"{}\" moved to {}", project.title, next.as_str()),
                Some(project_id),
            )
            .await;
        }
    }

    Ok(HttpResponse::Ok().json(UpdateStageResponse { changed: true, stage: next }))
}

// Handler to delete a project (owner or admin)
pub async fn delete_project(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    let project_id = path.into_inner();
    let project = fetch_project(pool.get_ref(), project_id).await?;

    let is_owner = project.owner_id == Some(user.user_id);
    policy::ensure(policy::can_delete_project(user.role, is_owner), "delete projects")?;

    sqlx::query("DELETE FROM projects WHERE project_id = $1")
        .bind(project_id)
        .execute(pool.get_ref())
        .await?;

    info!("Project {} deleted by user {}", project_id, user.user_id);
    Ok(HttpResponse::Ok().json(DeleteProjectResponse {
        success: true,
        message: "Project deleted successfully".to_string(),
    }))
}

async fn set_archived(
    pool: &PgPool,
    req: &HttpRequest,
    project_id: i32,
    archived: bool,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool, req).await?;
    let project = fetch_project(pool, project_id).await?;

    let is_owner = project.owner_id == Some(user.user_id);
    policy::ensure(policy::can_update_project(user.role, is_owner), "update projects")?;

    if project.is_archived == archived {
        return Ok(HttpResponse::Ok().json(ArchiveResponse { changed: false, is_archived: archived }));
    }

    sqlx::query("UPDATE projects SET is_archived = $2, updated_at = NOW() WHERE project_id = $1")
        .bind(project_id)
        .bind(archived)
        .execute(pool)
        .await?;

    fanout::record_activity(
        pool,
        project_id,
        user.user_id,
        if archived { "archived" } else { "unarchived" },
        "",
    )
    .await;
    Ok(HttpResponse::Ok().json(ArchiveResponse { changed: true, is_archived: archived }))
}

// Handlers to archive/unarchive. Archiving is orthogonal to stage; an
// archived project refuses stage changes until unarchived.
pub async fn archive_project(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    set_archived(pool.get_ref(), &req, path.into_inner(), true).await
}

pub async fn unarchive_project(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    set_archived(pool.get_ref(), &req, path.into_inner(), false).await
}

// Handler to list the audit trail of a project
pub async fn list_activity(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    authenticate(pool.get_ref(), &req).await?;
    let project_id = path.into_inner();
    fetch_project(pool.get_ref(), project_id).await?;

    let entries = sqlx::query_as::<_, ActivityEntry>(
        "SELECT * FROM activity_log WHERE project_id = $1 ORDER BY created_at DESC",
    )
    .bind(project_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project(stage: Stage, is_archived: bool) -> Project {
        Project {
            project_id: 1,
            title: "Acme RFP".to_string(),
            description: None,
            stage,
            priority: Priority::Medium,
            owner_id: None,
            progress: 0,
            is_archived,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn assignment_promotes_only_unassigned_projects() {
        assert_eq!(
            stage_after_owner_assignment(&project(Stage::Unassigned, false)).unwrap(),
            Some(Stage::Assigned)
        );
        assert_eq!(
            stage_after_owner_assignment(&project(Stage::Submitted, false)).unwrap(),
            None
        );
    }

    #[test]
    fn archived_projects_refuse_owner_reassignment() {
        for stage in [Stage::Unassigned, Stage::Assigned, Stage::Skipped] {
            let err = stage_after_owner_assignment(&project(stage, true)).unwrap_err();
            assert_eq!(err.to_string(), "cannot reassign an archived project");
        }
    }
}
