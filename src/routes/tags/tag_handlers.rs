use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use sqlx::PgPool;

use super::tag_models::{AddTagRequest, DeleteTagResponse, TagAssignmentResponse};
use crate::auth::authenticate;
use crate::error::ApiError;
use crate::models::tag::Tag;
use crate::policy;
use crate::routes::projects::project_handlers::fetch_project;

const DEFAULT_TAG_COLOR: &str = "#6b7280";

// Handler to list the workspace tag registry
pub async fn list_tags(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    authenticate(pool.get_ref(), &req).await?;

    let tags = sqlx::query_as::<_, Tag>("SELECT * FROM tags ORDER BY tag_name")
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(tags))
}

// Handler to add a tag (manager/admin). Duplicate names are 409.
pub async fn add_tag(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    request: web::Json<AddTagRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    policy::ensure(policy::can_manage_tags(user.role), "manage tags")?;

    let tag_name = request.tag_name.trim();
    if tag_name.is_empty() {
        return Err(ApiError::BadRequest("tag name must not be empty".to_string()));
    }

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags WHERE tag_name = $1")
        .bind(tag_name)
        .fetch_one(pool.get_ref())
        .await?;
    if existing > 0 {
        return Err(ApiError::Conflict(format!("tag {} already exists", tag_name)));
    }

    let tag = sqlx::query_as::<_, Tag>(
        "INSERT INTO tags (tag_name, color) VALUES ($1, $2) RETURNING *",
    )
    .bind(tag_name)
    .bind(request.color.as_deref().unwrap_or(DEFAULT_TAG_COLOR))
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| ApiError::conflict_on_unique(e, &format!("tag {} already exists", tag_name)))?;

    info!("Tag {} created by user {}", tag.tag_name, user.user_id);
    Ok(HttpResponse::Created().json(tag))
}

// Handler to delete a tag and its project assignments (manager/admin)
pub async fn delete_tag(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    policy::ensure(policy::can_manage_tags(user.role), "manage tags")?;

    let tag_id = path.into_inner();
    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags WHERE tag_id = $1")
        .bind(tag_id)
        .fetch_one(pool.get_ref())
        .await?;
    if existing == 0 {
        return Err(ApiError::NotFound("tag"));
    }

    // Assignments and the tag go in one transaction so a failure between
    // the two deletes cannot strand either side.
    let mut tx = pool.get_ref().begin().await?;
    sqlx::query("DELETE FROM project_tags WHERE tag_id = $1")
        .bind(tag_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM tags WHERE tag_id = $1")
        .bind(tag_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!("Tag {} deleted by user {}", tag_id, user.user_id);
    Ok(HttpResponse::Ok().json(DeleteTagResponse {
        success: true,
        message: "Tag deleted successfully".to_string(),
    }))
}

// Handler to attach a tag to a project. Re-assigning is a no-op.
pub async fn assign_tag(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    let (project_id, tag_id) = path.into_inner();
    let project = fetch_project(pool.get_ref(), project_id).await?;

    let is_owner = project.owner_id == Some(user.user_id);
    policy::ensure(policy::can_update_project(user.role, is_owner), "update projects")?;

    let tag_exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags WHERE tag_id = $1")
        .bind(tag_id)
        .fetch_one(pool.get_ref())
        .await?;
    if tag_exists == 0 {
        return Err(ApiError::NotFound("tag"));
    }

    let assigned = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM project_tags WHERE project_id = $1 AND tag_id = $2",
    )
    .bind(project_id)
    .bind(tag_id)
    .fetch_one(pool.get_ref())
    .await?;
    if assigned > 0 {
        return Ok(HttpResponse::Ok().json(TagAssignmentResponse {
            success: true,
            message: "Tag already assigned".to_string(),
        }));
    }

    sqlx::query("INSERT INTO project_tags (project_id, tag_id) VALUES ($1, $2)")
        .bind(project_id)
        .bind(tag_id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(TagAssignmentResponse {
        success: true,
        message: "Tag assigned successfully".to_string(),
    }))
}

// Handler to detach a tag from a project
pub async fn unassign_tag(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    let (project_id, tag_id) = path.into_inner();
    let project = fetch_project(pool.get_ref(), project_id).await?;

    let is_owner = project.owner_id == Some(user.user_id);
    policy::ensure(policy::can_update_project(user.role, is_owner), "update projects")?;

    sqlx::query("DELETE FROM project_tags WHERE project_id = $1 AND tag_id = $2")
        .bind(project_id)
        .bind(tag_id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(TagAssignmentResponse {
        success: true,
        message: "Tag removed successfully".to_string(),
    }))
}
