use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;

use crate::auth::extractors::AuthenticatedUser;
use crate::auth::token::verify_token;
use crate::error::AppError;

/// Middleware guarding every route except registration, login, and the health
/// check.
///
/// A request authenticates when its `Authorization: Bearer <token>` header
/// carries a token that (a) has a valid signature and expiry and (b) is still
/// present in the `sessions` table for the user it names. Tokens removed by
/// logout or account deletion therefore stop working immediately even though
/// their signature remains valid.
///
/// On success an [`AuthenticatedUser`] is inserted into the request
/// extensions for downstream extractors; on failure the request is rejected
/// with 401 and a generic body.
pub struct AuthMiddleware;

/// Routes reachable without a bearer token.
fn is_public(method: &Method, path: &str) -> bool {
    path == "/health"
        || (method == Method::POST && (path == "/users" || path == "/users/login"))
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
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
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_public(req.method(), req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Signature and expiry checks run before any store access; only a
            // well-formed token costs a session lookup.
            let token = bearer_token(&req)
                .ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;
            let claims = verify_token(&token)?;

            let pool = req
                .app_data::<web::Data<PgPool>>()
                .cloned()
                .ok_or_else(|| AppError::InternalServerError("Database pool not configured".into()))?;

            // The token must still be in the user's active session list.
            let session = sqlx::query_as::<_, (uuid::Uuid,)>(
                "SELECT id FROM sessions WHERE user_id = $1 AND token = $2",
            )
            .bind(claims.sub)
            .bind(&token)
            .fetch_optional(&**pool)
            .await
            .map_err(AppError::from)?;

            if session.is_none() {
                return Err(AppError::Unauthorized("Token revoked".into()).into());
            }

            req.extensions_mut().insert(AuthenticatedUser {
                user_id: claims.sub,
                token,
            });

            service.call(req).await
        })
    }
}
