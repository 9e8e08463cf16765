use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::sync::Arc;

use crate::auth::token::TokenService;
use crate::error::AppError;

/// Routes reachable without a bearer token.
pub fn is_public_route(method: &Method, path: &str) -> bool {
    match *method {
        Method::POST => path == "/signup" || path == "/login",
        Method::GET => {
            path == "/health"
                || path == "/blogs"
                || (path.starts_with("/blogposts/") && !path.ends_with("/like"))
        }
        // CORS preflight never carries credentials
        Method::OPTIONS => true,
        _ => false,
    }
}

/// What a request presented in its `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
pub enum Credential<'a> {
    /// No header, or a scheme with nothing after it.
    Missing,
    /// `Bearer <token>`, scheme matched case-insensitively.
    Bearer(&'a str),
    /// A credential under some other scheme, e.g. `Basic ...`.
    Unsupported,
}

/// Reads the `Authorization` header as `<scheme> <credential>`.
pub fn credential(req: &ServiceRequest) -> Credential<'_> {
    let value = match req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        Some(value) => value.trim(),
        None => return Credential::Missing,
    };

    match value.split_once(' ') {
        Some((scheme, rest)) if !rest.trim().is_empty() => {
            if scheme.eq_ignore_ascii_case("bearer") {
                Credential::Bearer(rest.trim())
            } else {
                Credential::Unsupported
            }
        }
        _ => Credential::Missing,
    }
}

/// Gate in front of every protected route.
///
/// No credential is a 401; a credential under another scheme or a token that fails
/// validation is a 403. On success the decoded
/// `Claims` are stored in the request extensions for `AuthenticatedUser` to pick up.
pub struct AuthMiddleware {
    tokens: Arc<TokenService>,
}

impl AuthMiddleware {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    tokens: Arc<TokenService>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_public_route(req.method(), req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let verdict = match credential(&req) {
            Credential::Missing => Err(AppError::Unauthorized("Token missing".into())),
            Credential::Unsupported => {
                log::debug!("Unsupported auth scheme on {} {}", req.method(), req.path());
                Err(invalid_token())
            }
            Credential::Bearer(token) => self.tokens.validate(token).map_err(|e| {
                log::debug!("Rejected token on {} {}: {}", req.method(), req.path(), e);
                invalid_token()
            }),
        };

        match verdict {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => {
                let response = req.error_response(app_err).map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

fn invalid_token() -> AppError {
    AppError::Forbidden("Invalid or expired token".into())
}
