use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::info;
use sqlx::PgPool;

use super::signature::{self, SignatureError};
use super::webhook_models::{IdentityEvent, IdentityWebhookSecret, WebhookResponse};
use crate::error::ApiError;

fn header<'a>(req: &'a HttpRequest, name: &'static str) -> Result<&'a str, ApiError> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest(format!("missing {} header", name)))
}

// Handler for identity provider lifecycle events. The raw body is verified
// against the signature headers before any JSON parsing happens.
pub async fn identity_webhook(
    pool: web::Data<PgPool>,
    secret: web::Data<IdentityWebhookSecret>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let msg_id = header(&req, "webhook-id")?;
    let timestamp = header(&req, "webhook-timestamp")?;
    let signature_header = header(&req, "webhook-signature")?;

    signature::verify(&secret.0, msg_id, timestamp, &body, signature_header, Utc::now()).map_err(
        |e| match e {
            SignatureError::InvalidSecret => {
                ApiError::Internal("webhook secret is misconfigured".to_string())
            }
            other => {
                info!("Rejected webhook {}: {}", msg_id, other);
                ApiError::Forbidden(format!("webhook rejected: {}", other))
            }
        },
    )?;

    let event: IdentityEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid webhook payload: {}", e)))?;

    match event.kind.as_str() {
        "user.created" | "user.updated" => {
            let external_id = event.data.id.as_str();
            let email = event.data.user_email.as_deref().ok_or_else(|| {
                ApiError::BadRequest(format!("{} event is missing user_email", event.kind))
            })?;
            let name = event
                .data
                .user_name
                .as_deref()
                .unwrap_or_else(|| email.split('@').next().unwrap_or(external_id));

            // Updates never touch role or the active flag; deactivation is
            // either an admin action or a user.deleted event.
            sqlx::query(
                "INSERT INTO users (external_id, user_name, user_email, role, is_active)
                 VALUES ($1, $2, $3, 'member', TRUE)
                 ON CONFLICT (external_id)
                 DO UPDATE SET user_name = EXCLUDED.user_name, user_email = EXCLUDED.user_email",
            )
            .bind(external_id)
            .bind(name)
            .bind(email)
            .execute(pool.get_ref())
            .await?;
            info!("Upserted user {} from {} event", external_id, event.kind);
        }
        "user.deleted" => {
            let external_id = event.data.id.as_str();
            sqlx::query("UPDATE users SET is_active = FALSE WHERE external_id = $1")
                .bind(external_id)
                .execute(pool.get_ref())
                .await?;
            sqlx::query(
                "DELETE FROM api_tokens
                 WHERE user_id IN (SELECT user_id FROM users WHERE external_id = $1)",
            )
            .bind(external_id)
            .execute(pool.get_ref())
            .await?;
            info!("Deactivated user {} from user.deleted event", external_id);
        }
        other => {
            info!("Ignoring unhandled identity event: {}", other);
        }
    }

    Ok(HttpResponse::Ok().json(WebhookResponse { received: true }))
}
