pub mod auth;
pub mod health;
pub mod items;
pub mod lists;

use std::sync::Arc;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::auth::{AuthMiddleware, TokenService};
use crate::error::AppError;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("invalid request body: {}", err)).into()
}

fn path_error(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("invalid path: {}", err)).into()
}

/// Registers `/auth` (public) and `/api` (behind `AuthMiddleware`).
///
/// The token service is passed in explicitly so the middleware and the
/// sign-in handler always share one signing key.
pub fn configure(tokens: Arc<TokenService>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .service(
                web::scope("/auth")
                    .service(auth::sign_up)
                    .service(auth::sign_in),
            )
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(tokens))
                    .service(
                        web::scope("/lists")
                            .service(lists::create_list)
                            .service(lists::get_lists)
                            .service(lists::get_list)
                            .service(lists::update_list)
                            .service(lists::delete_list)
                            .service(lists::create_item)
                            .service(lists::get_items),
                    )
                    .service(
                        web::scope("/items")
                            .service(items::get_item)
                            .service(items::update_item)
                            .service(items::delete_item),
                    ),
            );
    }
}
