//! Storage ports and their implementations.
//!
//! Every list and item operation takes the already authorized owner and uses it
//! as part of the store predicate, so a mutation can never reach a row owned by
//! somebody else even if ownership changed between the guard check and the query.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{
    ItemInput, ItemUpdate, ListInput, ListUpdate, NewUser, ResourceKind, TodoItem, TodoList, User,
    UserId,
};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Credential store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `AppError::DuplicateUsername` when the username is taken.
    async fn create_user(&self, user: NewUser) -> Result<UserId, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AppError>;
}

/// Resolves who owns a resource. Items resolve through their parent list.
#[async_trait]
pub trait OwnershipRepository: Send + Sync {
    async fn owner_of(&self, resource_id: i32, kind: ResourceKind)
        -> Result<Option<UserId>, AppError>;
}

#[async_trait]
pub trait ListRepository: Send + Sync {
    async fn create(&self, owner: UserId, input: ListInput) -> Result<i32, AppError>;

    async fn all(&self, owner: UserId) -> Result<Vec<TodoList>, AppError>;

    async fn get(&self, owner: UserId, list_id: i32) -> Result<Option<TodoList>, AppError>;

    /// Returns `false` when no row owned by `owner` matched.
    async fn update(&self, owner: UserId, list_id: i32, update: ListUpdate)
        -> Result<bool, AppError>;

    /// Removes the list and its items. Returns `false` when nothing matched.
    async fn delete(&self, owner: UserId, list_id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Returns `None` when the list is not owned by `owner`.
    async fn create(&self, owner: UserId, list_id: i32, input: ItemInput)
        -> Result<Option<i32>, AppError>;

    async fn all_in_list(&self, owner: UserId, list_id: i32) -> Result<Vec<TodoItem>, AppError>;

    async fn get(&self, owner: UserId, item_id: i32) -> Result<Option<TodoItem>, AppError>;

    async fn update(&self, owner: UserId, item_id: i32, update: ItemUpdate)
        -> Result<bool, AppError>;

    async fn delete(&self, owner: UserId, item_id: i32) -> Result<bool, AppError>;
}
