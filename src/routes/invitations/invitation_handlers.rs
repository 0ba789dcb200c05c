use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use sqlx::PgPool;

use super::invitation_models::{
    AcceptInvitationRequest, CreateInvitationRequest, RevokeInvitationResponse,
};
use crate::auth::authenticate;
use crate::error::ApiError;
use crate::fanout;
use crate::models::invitation::{Invitation, InvitationStatus};
use crate::models::notification::NotificationKind;
use crate::models::user::{Role, User};
use crate::policy;
use uuid::Uuid;

async fn fetch_invitation(pool: &PgPool, invitation_id: i32) -> Result<Invitation, ApiError> {
    sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE invitation_id = $1")
        .bind(invitation_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("invitation"))
}

// Handler to list invitations (manager/admin), newest first
pub async fn list_invitations(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    policy::ensure(policy::can_invite(user.role), "view invitations")?;

    let invitations = sqlx::query_as::<_, Invitation>(
        "SELECT * FROM invitations ORDER BY created_at DESC",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(invitations))
}

// Handler to create an invitation (manager/admin). Inviting with the admin
// role is admin only; a pending invitation or existing member is 409.
pub async fn create_invitation(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    request: web::Json<CreateInvitationRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    policy::ensure(policy::can_invite(user.role), "create invitations")?;

    let email = request.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("a valid email is required".to_string()));
    }

    let role = request.role.unwrap_or(Role::Member);
    if role == Role::Admin {
        policy::ensure(policy::can_manage_users(user.role), "invite admins")?;
    }

    let pending = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM invitations WHERE email = $1 AND status = 'pending'",
    )
    .bind(&email)
    .fetch_one(pool.get_ref())
    .await?;
    if pending > 0 {
        return Err(ApiError::Conflict(format!("{} already has a pending invitation", email)));
    }

    let member = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE user_email = $1 AND is_active",
    )
    .bind(&email)
    .fetch_one(pool.get_ref())
    .await?;
    if member > 0 {
        return Err(ApiError::Conflict(format!("{} is already a member", email)));
    }

    let invitation = sqlx::query_as::<_, Invitation>(
        "INSERT INTO invitations (invite_token, email, role, invited_by, status)
         VALUES ($1, $2, $3, $4, 'pending')
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(role.as_str())
    .bind(user.user_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        ApiError::conflict_on_unique(e, &format!("{} already has a pending invitation", email))
    })?;

    info!("Invitation {} created for {} by user {}", invitation.invitation_id, email, user.user_id);
    Ok(HttpResponse::Created().json(invitation))
}

// Handler to revoke a pending invitation (admin only)
pub async fn revoke_invitation(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(pool.get_ref(), &req).await?;
    policy::ensure(policy::can_manage_users(user.role), "revoke invitations")?;

    let invitation = fetch_invitation(pool.get_ref(), path.into_inner()).await?;
    if invitation.status != InvitationStatus::Pending {
        return Err(ApiError::Unprocessable(format!(
            "invitation is already {}",
            invitation.status.as_str()
        )));
    }

    sqlx::query("UPDATE invitations SET status = 'revoked' WHERE invitation_id = $1")
        .bind(invitation.invitation_id)
        .execute(pool.get_ref())
        .await?;

    info!("Invitation {} revoked by admin {}", invitation.invitation_id, user.user_id);
    Ok(HttpResponse::Ok().json(RevokeInvitationResponse {
        success: true,
        message: "Invitation revoked".to_string(),
    }))
}

// Handler to accept an invitation and create the member row. Token-less:
// the caller presents the external identity handed out by the identity
// provider during sign-up.
pub async fn accept_invitation(
    pool: web::Data<PgPool>,
    request: web::Json<AcceptInvitationRequest>,
) -> Result<HttpResponse, ApiError> {
    let invitation = sqlx::query_as::<_, Invitation>(
        "SELECT * FROM invitations WHERE invite_token = $1",
    )
    .bind(request.invite_token)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(ApiError::NotFound("invitation"))?;
    if invitation.status != InvitationStatus::Pending {
        return Err(ApiError::Unprocessable(format!(
            "invitation is already {}",
            invitation.status.as_str()
        )));
    }

    let user_name = request.user_name.trim();
    if user_name.is_empty() || request.external_id.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "external_id and user_name are required".to_string(),
        ));
    }

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE external_id = $1 OR user_email = $2",
    )
    .bind(request.external_id.trim())
    .bind(&invitation.email)
    .fetch_one(pool.get_ref())
    .await?;
    if existing > 0 {
        return Err(ApiError::Conflict("user is already registered".to_string()));
    }

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (external_id, user_name, user_email, role, is_active)
         VALUES ($1, $2, $3, $4, TRUE)
         RETURNING *",
    )
    .bind(request.external_id.trim())
    .bind(user_name)
    .bind(&invitation.email)
    .bind(invitation.role.as_str())
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| ApiError::conflict_on_unique(e, "user is already registered"))?;

    sqlx::query("UPDATE invitations SET status = 'accepted' WHERE invitation_id = $1")
        .bind(invitation.invitation_id)
        .execute(pool.get_ref())
        .await?;

    info!("Invitation {} accepted by {}", invitation.invitation_id, user.user_name);
    fanout::notify(
        pool.get_ref(),
        invitation.invited_by,
        NotificationKind::Invited,
        &format!("{} accepted your invitation", user.user_name),
        None,
    )
    .await;

    Ok(HttpResponse::Created().json(user))
}
