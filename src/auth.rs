use actix_web::HttpRequest;
use log::info;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::models::user::Role;

/// Caller identity resolved from the bearer token.
#[derive(Debug, sqlx::FromRow)]
pub struct AuthedUser {
    pub user_id: i32,
    pub user_name: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub is_active: bool,
}

/// Pull the bearer token out of the Authorization header, if present and
/// well-formed.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the caller from the Authorization header. Unknown or expired
/// tokens get 401; a deactivated account resolves but is rejected with 403
/// on every authenticated endpoint.
pub async fn authenticate(pool: &PgPool, req: &HttpRequest) -> Result<AuthedUser, ApiError> {
    let token = match bearer_token(req) {
        Some(token) => token,
        None => {
            info!("Missing bearer token on {}", req.path());
            return Err(ApiError::Unauthorized);
        }
    };

    let user = sqlx::query_as::<_, AuthedUser>(
        "SELECT u.user_id, u.user_name, u.role, u.is_active
         FROM api_tokens t
         JOIN users u ON u.user_id = t.user_id
         WHERE t.token = $1 AND t.expires_at > NOW()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        info!("Invalid or expired token on {}", req.path());
        ApiError::Unauthorized
    })?;

    if !user.is_active {
        return Err(ApiError::Forbidden("account is deactivated".to_string()));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn bearer_token_strips_scheme() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc-123"))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("abc-123"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes_and_absence() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic abc"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&req), None);
    }
}
