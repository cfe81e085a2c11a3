use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// The identity resolved for the current request.
///
/// `AuthMiddleware` validates the bearer token and inserts this value into
/// the request extensions; handlers receive it through `FromRequest`. The
/// presenting token is carried along so that logout can revoke exactly the
/// session that made the request.
///
/// If the value is absent (the middleware did not run or failed to insert
/// it), extraction returns `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub token: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                // Should not be reached when AuthMiddleware is correctly
                // applied; responding with Unauthorized is the safe default.
                let err = AppError::Unauthorized(
                    "Identity not found in request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
