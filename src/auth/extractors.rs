use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::token::Claims;
use crate::error::AppError;

/// The caller of a protected route, as established by `AuthMiddleware`.
///
/// If the claims are missing from the request extensions (the middleware did not
/// run), extraction fails with `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthenticatedUser { id: claims.sub })),
            None => {
                let err = AppError::Unauthorized("Token missing".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
