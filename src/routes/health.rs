use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::models::UserId;
use crate::state::AppState;

/// Liveness plus a storage round trip. Public: served outside `/api`.
///
/// Answers 503 when the store cannot be queried, so a load balancer stops
/// routing to an instance whose database is gone.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    // Id 0 is never assigned; the lookup only proves the store answers.
    match state.users.find_by_id(UserId(0)).await {
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "timestamp": Utc::now()
        })),
        Err(err) => {
            log::error!("health check could not reach storage: {}", err);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "timestamp": Utc::now()
            }))
        }
    }
}
