use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::fmt;
use std::sync::Arc;

use crate::auth::extractors::AuthenticatedRequestContext;
use crate::auth::token::{TokenError, TokenService};
use crate::error::AppError;

const BEARER_SCHEME: &str = "Bearer";

/// Internal reason a request was refused. Logged, never sent to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingCredential,
    MalformedCredential,
    InvalidToken(TokenError),
}

impl fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthRejection::MissingCredential => f.write_str("no authorization header"),
            AuthRejection::MalformedCredential => f.write_str("malformed authorization header"),
            AuthRejection::InvalidToken(reason) => write!(f, "invalid token: {}", reason),
        }
    }
}

/// Splits `Bearer <token>` into the token. Exactly one space after the scheme and a
/// single non-empty token segment are accepted.
pub fn bearer_token(value: Option<&HeaderValue>) -> Result<&str, AuthRejection> {
    let value = value.ok_or(AuthRejection::MissingCredential)?;
    let value = value
        .to_str()
        .map_err(|_| AuthRejection::MalformedCredential)?;

    match value.split_once(' ') {
        Some((BEARER_SCHEME, token))
            if !token.is_empty() && !token.contains(char::is_whitespace) =>
        {
            Ok(token)
        }
        _ => Err(AuthRejection::MalformedCredential),
    }
}

/// Resolves the caller's identity from the `Authorization` header.
pub fn authenticate(
    tokens: &TokenService,
    value: Option<&HeaderValue>,
) -> Result<AuthenticatedRequestContext, AuthRejection> {
    let token = bearer_token(value)?;
    let user_id = tokens
        .validate(token)
        .map_err(AuthRejection::InvalidToken)?;
    Ok(AuthenticatedRequestContext { user_id })
}

/// Protects every service it wraps: requests without a valid bearer token are
/// answered with 401 and never reach the inner service.
///
/// The rejection is returned as a response rather than an `Err` so the scope's
/// outer middleware (CORS, access log) still sees a normal reply.
#[derive(Clone)]
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
        let outcome = authenticate(&self.tokens, req.headers().get(header::AUTHORIZATION));

        match outcome {
            Ok(context) => {
                log::debug!("authenticated user {} for {}", context.user_id, req.path());
                req.extensions_mut().insert(context);
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Err(rejection) => {
                log::warn!(
                    "rejected {} {}: {}",
                    req.method(),
                    req.path(),
                    rejection
                );
                let response = AppError::unauthorized().error_response();
                let res = req.into_response(response).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
