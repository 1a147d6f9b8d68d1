use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::UserId;

/// Per-request identity, inserted into the request extensions by `AuthMiddleware`
/// and dropped with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedRequestContext {
    pub user_id: UserId,
}

/// Returns the identity `AuthMiddleware` attached to this request.
///
/// A request that never went through the middleware is a routing defect: it is
/// reported as `InternalInconsistency` and the request fails closed.
pub fn current_user_id(req: &HttpRequest) -> Result<UserId, AppError> {
    match req.extensions().get::<AuthenticatedRequestContext>() {
        Some(context) => Ok(context.user_id),
        None => Err(AppError::InternalInconsistency(format!(
            "no authenticated identity on {} {}; is AuthMiddleware wrapping this route?",
            req.method(),
            req.path()
        ))),
    }
}

/// Extracts the authenticated user's ID for handlers behind `AuthMiddleware`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub UserId);

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            current_user_id(req)
                .map(AuthenticatedUser)
                .map_err(Into::into),
        )
    }
}
