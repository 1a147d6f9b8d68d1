use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{
        DataResponse, IdResponse, ItemInput, ListInput, ListUpdate, ResourceKind, StatusResponse,
    },
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

pub(crate) const EMPTY_UPDATE: &str = "update structure has no values";

/// Creates a list owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: `{"id": n}`.
/// - `422 Unprocessable Entity`: title empty or too long.
#[post("")]
pub async fn create_list(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    input: web::Json<ListInput>,
) -> Result<impl Responder, AppError> {
    input.validate()?;
    let id = state.lists.create(user.0, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(IdResponse { id }))
}

/// Lists every list of the authenticated user as `{"data": [...]}`.
#[get("")]
pub async fn get_lists(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let data = state.lists.all(user.0).await?;
    Ok(HttpResponse::Ok().json(DataResponse { data }))
}

/// Fetches one list.
///
/// ## Responses:
/// - `200 OK`: the list.
/// - `403 Forbidden`: the list belongs to another user.
/// - `404 Not Found`: no such list.
#[get("/{id}")]
pub async fn get_list(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    list_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let list_id = list_id.into_inner();
    state
        .guard
        .authorize(user.0, list_id, ResourceKind::List)
        .await?;

    let list = state
        .lists
        .get(user.0, list_id)
        .await?
        .ok_or_else(|| AppError::NotFound("list not found".into()))?;
    Ok(HttpResponse::Ok().json(list))
}

/// Partially updates a list. An update without any field is a 400.
#[put("/{id}")]
pub async fn update_list(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    list_id: web::Path<i32>,
    input: web::Json<ListUpdate>,
) -> Result<impl Responder, AppError> {
    if input.is_empty() {
        return Err(AppError::BadRequest(EMPTY_UPDATE.into()));
    }
    input.validate()?;
    let list_id = list_id.into_inner();
    state
        .guard
        .authorize(user.0, list_id, ResourceKind::List)
        .await?;

    if !state.lists.update(user.0, list_id, input.into_inner()).await? {
        return Err(AppError::NotFound("list not found".into()));
    }
    Ok(HttpResponse::Ok().json(StatusResponse::ok()))
}

/// Deletes a list together with its items.
#[delete("/{id}")]
pub async fn delete_list(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    list_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let list_id = list_id.into_inner();
    state
        .guard
        .authorize(user.0, list_id, ResourceKind::List)
        .await?;

    if !state.lists.delete(user.0, list_id).await? {
        return Err(AppError::NotFound("list not found".into()));
    }
    Ok(HttpResponse::Ok().json(StatusResponse::ok()))
}

/// Adds an item to one of the user's lists.
#[post("/{id}/items")]
pub async fn create_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    list_id: web::Path<i32>,
    input: web::Json<ItemInput>,
) -> Result<impl Responder, AppError> {
    input.validate()?;
    let list_id = list_id.into_inner();
    state
        .guard
        .authorize(user.0, list_id, ResourceKind::List)
        .await?;

    let id = state
        .items
        .create(user.0, list_id, input.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("list not found".into()))?;
    Ok(HttpResponse::Created().json(IdResponse { id }))
}

/// Lists the items of one of the user's lists as `{"data": [...]}`.
#[get("/{id}/items")]
pub async fn get_items(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    list_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let list_id = list_id.into_inner();
    state
        .guard
        .authorize(user.0, list_id, ResourceKind::List)
        .await?;

    let data = state.items.all_in_list(user.0, list_id).await?;
    Ok(HttpResponse::Ok().json(DataResponse { data }))
}
