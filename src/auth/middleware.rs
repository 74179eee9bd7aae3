use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::TokenKeys;
use crate::error::AppError;

/// Authentication gate for the `/api` scope.
///
/// Holds the process-wide [`TokenKeys`] and, for every request that is not
/// an auth entry point, requires a valid bearer token. On success the decoded
/// [`crate::auth::token::Claims`] are inserted into the request extensions,
/// where the [`crate::auth::extractors::CurrentUser`] extractor picks them up.
pub struct AuthMiddleware {
    keys: TokenKeys,
}

impl AuthMiddleware {
    pub fn new(keys: TokenKeys) -> Self {
        Self { keys }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            keys: self.keys.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    keys: TokenKeys,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Signup and login are the only unauthenticated endpoints in the scope.
        let path = req.path();
        if path.starts_with("/api/auth/login") || path.starts_with("/api/auth/signup") {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let bearer_token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match bearer_token {
            Some(token) => match self.keys.validate(token) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    let fut = self.service.call(req);
                    Box::pin(fut)
                }
                Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
            },
            None => {
                let app_err = AppError::Unauthorized("Missing token".into());
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::Claims;
    use actix_web::{test, web, App, HttpRequest, HttpResponse};
    use uuid::Uuid;

    async fn echo_subject(req: HttpRequest) -> HttpResponse {
        match req.extensions().get::<Claims>() {
            Some(claims) => HttpResponse::Ok().json(serde_json::json!({ "sub": claims.sub })),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    fn keys() -> TokenKeys {
        TokenKeys::new("middleware-test-secret", 30)
    }

    #[actix_rt::test]
    async fn test_valid_token_passes_and_claims_are_inserted() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id).unwrap();

        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(keys))
                    .route("/whoami", web::get().to(echo_subject)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["sub"], serde_json::json!(user_id));
    }

    #[actix_rt::test]
    async fn test_missing_and_invalid_tokens_are_rejected() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(keys()))
                    .route("/whoami", web::get().to(echo_subject)),
            ),
        )
        .await;

        // No Authorization header at all.
        let req = test::TestRequest::get().uri("/api/whoami").to_request();
        let resp = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(resp.error_response().status(), 401);

        // Wrong scheme.
        let req = test::TestRequest::get()
            .uri("/api/whoami")
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_request();
        let resp = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(resp.error_response().status(), 401);

        // Garbage bearer token.
        let req = test::TestRequest::get()
            .uri("/api/whoami")
            .insert_header((header::AUTHORIZATION, "Bearer garbage"))
            .to_request();
        let resp = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(resp.error_response().status(), 401);
    }

    #[actix_rt::test]
    async fn test_auth_entry_points_skip_the_gate() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(keys()))
                    .route("/auth/login", web::post().to(HttpResponse::Ok))
                    .route("/auth/signup", web::post().to(HttpResponse::Ok)),
            ),
        )
        .await;

        for uri in ["/api/auth/login", "/api/auth/signup"] {
            let req = test::TestRequest::post().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success(), "{} should not require auth", uri);
        }
    }
}
