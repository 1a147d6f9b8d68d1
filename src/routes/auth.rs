use crate::{
    error::AppError,
    models::{NewUser, SignInRequest, SignUpRequest, SignUpResponse, TokenResponse},
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates the account and answers `201 {"id": n}`. A taken username yields 409.
#[post("/sign-up")]
pub async fn sign_up(
    state: web::Data<AppState>,
    payload: web::Json<SignUpRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let payload = payload.into_inner();

    let password_hash = state.hasher.hash_password(&payload.password)?;
    let id = state
        .users
        .create_user(NewUser {
            name: payload.name,
            username: payload.username.clone(),
            password_hash,
        })
        .await?;

    log::info!("registered user {} ({})", id, payload.username);
    Ok(HttpResponse::Created().json(SignUpResponse { id: id.0 }))
}

/// Sign in
///
/// Exchanges a username and password for a bearer token. Unknown users and wrong
/// passwords get the same 401.
#[post("/sign-in")]
pub async fn sign_in(
    state: web::Data<AppState>,
    payload: web::Json<SignInRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let user = state.users.find_by_username(&payload.username).await?;
    let Some(user) = user else {
        log::warn!("sign-in for unknown username {}", payload.username);
        return Err(AppError::Unauthorized("invalid credentials".into()));
    };

    if !state
        .hasher
        .verify_password(&payload.password, &user.password_hash)?
    {
        log::warn!("sign-in with wrong password for user {}", user.id);
        return Err(AppError::Unauthorized("invalid credentials".into()));
    }

    let token = state.tokens.issue(user.id)?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
