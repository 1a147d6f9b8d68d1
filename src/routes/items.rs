use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{ItemUpdate, ResourceKind, StatusResponse},
    routes::lists::EMPTY_UPDATE,
    state::AppState,
};
use actix_web::{delete, get, put, web, HttpResponse, Responder};
use validator::Validate;

// Item ownership is checked through the parent list by the guard and again by
// the store predicate; items never carry an owner of their own.

#[get("/{id}")]
pub async fn get_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    item_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let item_id = item_id.into_inner();
    state
        .guard
        .authorize(user.0, item_id, ResourceKind::Item)
        .await?;

    let item = state
        .items
        .get(user.0, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("item not found".into()))?;
    Ok(HttpResponse::Ok().json(item))
}

#[put("/{id}")]
pub async fn update_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    item_id: web::Path<i32>,
    input: web::Json<ItemUpdate>,
) -> Result<impl Responder, AppError> {
    if input.is_empty() {
        return Err(AppError::BadRequest(EMPTY_UPDATE.into()));
    }
    input.validate()?;
    let item_id = item_id.into_inner();
    state
        .guard
        .authorize(user.0, item_id, ResourceKind::Item)
        .await?;

    if !state.items.update(user.0, item_id, input.into_inner()).await? {
        return Err(AppError::NotFound("item not found".into()));
    }
    Ok(HttpResponse::Ok().json(StatusResponse::ok()))
}

#[delete("/{id}")]
pub async fn delete_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    item_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let item_id = item_id.into_inner();
    state
        .guard
        .authorize(user.0, item_id, ResourceKind::Item)
        .await?;

    if !state.items.delete(user.0, item_id).await? {
        return Err(AppError::NotFound("item not found".into()));
    }
    Ok(HttpResponse::Ok().json(StatusResponse::ok()))
}
