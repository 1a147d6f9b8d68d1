#![doc = "The `todolist_api` library crate."]
#![doc = ""]
#![doc = "A multi-user to-do list service. Users sign up and sign in for a bearer token;"]
#![doc = "every list and item is owned by one user and only that user can read or change it."]
#![doc = "The binary (`main.rs`) loads `Config`, builds `AppState` and hands both to `server::run`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod server;
pub mod state;

pub use crate::error::AppError;
pub use crate::state::AppState;
