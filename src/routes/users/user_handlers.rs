use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use sqlx::PgPool;

use super::user_models::SetRoleRequest;
use crate::auth::authenticate;
use crate::error::ApiError;
use crate::models::user::User;
use crate::policy;

async fn fetch_user(pool: &PgPool, user_id: i32) -> Result<User, ApiError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("user"))
}

// Handler to return the caller's own user row
pub async fn me(pool: web::Data<PgPool>, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let caller = authenticate(pool.get_ref(), &req).await?;
    let user = fetch_user(pool.get_ref(), caller.user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

// Handler to list workspace members
pub async fn list_users(pool: web::Data<PgPool>, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    authenticate(pool.get_ref(), &req).await?;

    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY user_name")
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(users))
}

// Handler to change another user's role (admin only)
pub async fn set_role(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<SetRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = authenticate(pool.get_ref(), &req).await?;
    policy::ensure(policy::can_manage_users(caller.role), "manage users")?;

    let user_id = path.into_inner();
    if user_id == caller.user_id {
        return Err(ApiError::BadRequest("cannot change your own role".to_string()));
    }
    fetch_user(pool.get_ref(), user_id).await?;

    let updated = sqlx::query_as::<_, User>(
        "UPDATE users SET role = $2 WHERE user_id = $1 RETURNING *",
    )
    .bind(user_id)
    .bind(request.role.as_str())
    .fetch_one(pool.get_ref())
    .await?;

    info!("User {} role set to {} by admin {}", user_id, request.role.as_str(), caller.user_id);
    Ok(HttpResponse::Ok().json(updated))
}

// Handler to deactivate an account (admin only). Outstanding tokens are
// revoked so the account stops resolving immediately.
pub async fn deactivate(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let caller = authenticate(pool.get_ref(), &req).await?;
    policy::ensure(policy::can_manage_users(caller.role), "manage users")?;

    let user_id = path.into_inner();
    if user_id == caller.user_id {
        return Err(ApiError::BadRequest("cannot deactivate your own account".to_string()));
    }
    fetch_user(pool.get_ref(), user_id).await?;

    let updated = sqlx::query_as::<_, User>(
        "UPDATE users SET is_active = FALSE WHERE user_id = $1 RETURNING *",
    )
    .bind(user_id)
    .fetch_one(pool.get_ref())
    .await?;
    sqlx::query("DELETE FROM api_tokens WHERE user_id = $1")
        .bind(user_id)
        .execute(pool.get_ref())
        .await?;

    info!("User {} deactivated by admin {}", user_id, caller.user_id);
    Ok(HttpResponse::Ok().json(updated))
}

// Handler to reactivate an account (admin only)
pub async fn reactivate(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let caller = authenticate(pool.get_ref(), &req).await?;
    policy::ensure(policy::can_manage_users(caller.role), "manage users")?;

    let user_id = path.into_inner();
    fetch_user(pool.get_ref(), user_id).await?;

    let updated = sqlx::query_as::<_, User>(
        "UPDATE users SET is_active = TRUE WHERE user_id = $1 RETURNING *",
    )
    .bind(user_id)
    .fetch_one(pool.get_ref())
    .await?;

    info!("User {} reactivated by admin {}", user_id, caller.user_id);
    Ok(HttpResponse::Ok().json(updated))
}
