use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;

use super::attribute_models::{AddAttributeRequest, DeleteAttributeResponse};
use crate::auth::authenticate;
use crate::error::ApiError;
use crate::models::custom_attribute::CustomAttribute;
use crate::policy;
use crate::routes::projects::project_handlers::fetch_project;

// Handler to list a project's custom attributes
pub async fn list_attributes(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    authenticate(pool.get_ref(), &req).await?;
    let project_id = path.into_inner();
    fetch_project(pool.get_ref(), project_id).await?;

    let attributes = sqlx::query_as::<_, CustomAttribute>(
        "SELECT * FROM custom_attributes WHERE project_id = $1 ORDER BY attr_name",
    )
    .bind(project_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(attributes))
}

// Handler to set a custom attribute; posting an existing name overwrites
// its value.
pub async fn add_attribute(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<AddAttributeRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    let project_id = path.into_inner();
    let project = fetch_project(pool.get_ref(), project_id).await?;

    let is_owner = project.owner_id == Some(user.user_id);
    policy::ensure(policy::can_update_project(user.role, is_owner), "update projects")?;

    let attr_name = request.attr_name.trim();
    if attr_name.is_empty() {
        return Err(ApiError::BadRequest("attribute name must not be empty".to_string()));
    }

    let attribute = sqlx::query_as::<_, CustomAttribute>(
        "INSERT INTO custom_attributes (project_id, attr_name, attr_value)
         VALUES ($1, $2, $3)
         ON CONFLICT (project_id, attr_name) DO UPDATE SET attr_value = EXCLUDED.attr_value
         RETURNING *",
    )
    .bind(project_id)
    .bind(attr_name)
    .bind(&request.attr_value)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(attribute))
}

// Handler to delete a custom attribute
pub async fn delete_attribute(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;

    let attribute = sqlx::query_as::<_, CustomAttribute>(
        "SELECT * FROM custom_attributes WHERE attribute_id = $1",
    )
    .bind(path.into_inner())
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(ApiError::NotFound("attribute"))?;

    let project = fetch_project(pool.get_ref(), attribute.project_id).await?;
    let is_owner = project.owner_id == Some(user.user_id);
    policy::ensure(policy::can_update_project(user.role, is_owner), "update projects")?;

    sqlx::query("DELETE FROM custom_attributes WHERE attribute_id = $1")
        .bind(attribute.attribute_id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(DeleteAttributeResponse {
        success: true,
        message: "Attribute deleted successfully".to_string(),
    }))
}
