use std::fmt;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{ResourceKind, UserId};
use crate::repository::OwnershipRepository;

/// How a resource relates to the user asking for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owner,
    Missing,
    NotOwner,
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Ownership::Owner => f.write_str("is owned by the caller"),
            Ownership::Missing => f.write_str("does not exist"),
            Ownership::NotOwner => f.write_str("is owned by another user"),
        }
    }
}

/// Confirms that the authenticated user owns a list or item before any read or
/// write on it.
///
/// `Missing` and `NotOwner` are logged with their own wording but surface as
/// `NotFound` and `Forbidden` with messages that reveal nothing about the
/// other owner.
#[derive(Clone)]
pub struct OwnershipGuard {
    owners: Arc<dyn OwnershipRepository>,
}

impl OwnershipGuard {
    pub fn new(owners: Arc<dyn OwnershipRepository>) -> Self {
        Self { owners }
    }

    pub async fn resolve(
        &self,
        user_id: UserId,
        resource_id: i32,
        kind: ResourceKind,
    ) -> Result<Ownership, AppError> {
        Ok(match self.owners.owner_of(resource_id, kind).await? {
            None => Ownership::Missing,
            Some(owner) if owner == user_id => Ownership::Owner,
            Some(_) => Ownership::NotOwner,
        })
    }

    pub async fn authorize(
        &self,
        user_id: UserId,
        resource_id: i32,
        kind: ResourceKind,
    ) -> Result<(), AppError> {
        let ownership = self.resolve(user_id, resource_id, kind).await?;
        if ownership == Ownership::Owner {
            return Ok(());
        }

        log::warn!(
            "user {} requested {} {} which {}",
            user_id,
            kind,
            resource_id,
            ownership
        );
        match ownership {
            Ownership::Missing => Err(AppError::NotFound(format!("{} not found", kind))),
            _ => Err(AppError::Forbidden("access denied".into())),
        }
    }
}
