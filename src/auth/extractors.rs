use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;

use crate::auth::token::{Claims, CREDENTIALS_ERROR};
use crate::error::AppError;
use crate::models::User;

/// Resolves the authenticated caller to a fresh `User` row.
///
/// `AuthMiddleware` has already verified the bearer token and stashed its
/// [`Claims`] in the request extensions; this extractor completes identity
/// resolution by looking the subject up in the database on every request.
/// A user that was deleted after the token was issued therefore stops
/// authenticating immediately, and the failure is indistinguishable from a
/// bad token.
#[derive(Debug)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ActixError; // AppError will be converted into ActixError via ResponseError
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let claims = req.extensions().get::<Claims>().cloned();
            let claims = match claims {
                // Claims can only be absent if AuthMiddleware did not run on
                // this route; reject rather than assume an identity.
                None => return Err(AppError::Unauthorized("Missing token".into()).into()),
                Some(claims) => claims,
            };

            let pool = match req.app_data::<web::Data<PgPool>>() {
                Some(pool) => pool.clone(),
                None => {
                    return Err(
                        AppError::InternalServerError("Database pool not configured".into()).into(),
                    )
                }
            };

            let user = sqlx::query_as::<_, User>(
                "SELECT id, email, name, password_hash, created_at FROM users WHERE id = $1",
            )
            .bind(claims.sub)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(AppError::from)?;

            match user {
                Some(user) => Ok(CurrentUser(user)),
                // The account may have been deleted after the token was
                // issued. Still a 401, never a 404.
                None => Err(AppError::Unauthorized(CREDENTIALS_ERROR.into()).into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use uuid::Uuid;

    #[actix_rt::test]
    async fn test_current_user_without_claims_is_unauthorized() {
        let req = test::TestRequest::default().to_http_request();
        // No Claims inserted into extensions.

        let mut payload = Payload::None;
        let result = CurrentUser::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let err = result.unwrap_err();
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_current_user_without_pool_is_internal_error() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(Claims {
            sub: Uuid::new_v4(),
            exp: 2_000_000_000,
            iat: 1_000_000_000,
        });

        let mut payload = Payload::None;
        let result = CurrentUser::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let err = result.unwrap_err();
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
