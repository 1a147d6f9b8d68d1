//! Authentication and ownership authorization.
//!
//! `TokenService` issues and checks bearer tokens, `AuthMiddleware` turns a
//! request's `Authorization` header into an `AuthenticatedRequestContext`,
//! `AuthenticatedUser` hands that identity to handlers, and `OwnershipGuard`
//! decides whether the identity may touch a given list or item.

pub mod extractors;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod token;

pub use extractors::{current_user_id, AuthenticatedRequestContext, AuthenticatedUser};
pub use middleware::{AuthMiddleware, AuthRejection};
pub use ownership::{Ownership, OwnershipGuard};
pub use password::{BcryptHasher, PasswordHasher};
pub use token::{Claims, TokenError, TokenService};
