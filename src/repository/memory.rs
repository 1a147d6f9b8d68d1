//! In-process store used by the test suite and by `STORAGE=memory` runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ItemRepository, ListRepository, OwnershipRepository, UserRepository};
use crate::error::AppError;
use crate::models::{
    ItemInput, ItemUpdate, ListInput, ListUpdate, NewUser, ResourceKind, TodoItem, TodoList, User,
    UserId,
};

struct StoredList {
    owner: UserId,
    list: TodoList,
}

struct StoredItem {
    list_id: i32,
    item: TodoItem,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    lists: BTreeMap<i32, StoredList>,
    items: BTreeMap<i32, StoredItem>,
    next_user_id: i32,
    next_list_id: i32,
    next_item_id: i32,
}

impl Tables {
    fn list_owned_by(&self, owner: UserId, list_id: i32) -> Option<&StoredList> {
        self.lists.get(&list_id).filter(|stored| stored.owner == owner)
    }

    fn item_owner(&self, item_id: i32) -> Option<UserId> {
        let stored = self.items.get(&item_id)?;
        self.lists.get(&stored.list_id).map(|list| list.owner)
    }
}

/// Ids start at 1 and increase per table, like `SERIAL` columns.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<UserId, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(AppError::DuplicateUsername("username already taken".into()));
        }
        let id = UserId(next_id(&mut tables.next_user_id));
        tables.users.insert(
            id.0,
            User {
                id,
                name: user.name,
                username: user.username,
                password_hash: user.password_hash,
            },
        );
        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id.0).cloned())
    }
}

#[async_trait]
impl OwnershipRepository for MemoryStore {
    async fn owner_of(
        &self,
        resource_id: i32,
        kind: ResourceKind,
    ) -> Result<Option<UserId>, AppError> {
        let tables = self.tables.read().await;
        Ok(match kind {
            ResourceKind::List => tables.lists.get(&resource_id).map(|stored| stored.owner),
            ResourceKind::Item => tables.item_owner(resource_id),
        })
    }
}

#[async_trait]
impl ListRepository for MemoryStore {
    async fn create(&self, owner: UserId, input: ListInput) -> Result<i32, AppError> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.next_list_id);
        tables.lists.insert(
            id,
            StoredList {
                owner,
                list: TodoList {
                    id,
                    title: input.title,
                    description: input.description,
                },
            },
        );
        Ok(id)
    }

    async fn all(&self, owner: UserId) -> Result<Vec<TodoList>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .lists
            .values()
            .filter(|stored| stored.owner == owner)
            .map(|stored| stored.list.clone())
            .collect())
    }

    async fn get(&self, owner: UserId, list_id: i32) -> Result<Option<TodoList>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .list_owned_by(owner, list_id)
            .map(|stored| stored.list.clone()))
    }

    async fn update(
        &self,
        owner: UserId,
        list_id: i32,
        update: ListUpdate,
    ) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables
            .lists
            .get_mut(&list_id)
            .filter(|stored| stored.owner == owner)
        else {
            return Ok(false);
        };
        if let Some(title) = update.title {
            stored.list.title = title;
        }
        if let Some(description) = update.description {
            stored.list.description = Some(description);
        }
        Ok(true)
    }

    async fn delete(&self, owner: UserId, list_id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.list_owned_by(owner, list_id).is_none() {
            return Ok(false);
        }
        tables.lists.remove(&list_id);
        tables.items.retain(|_, stored| stored.list_id != list_id);
        Ok(true)
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn create(
        &self,
        owner: UserId,
        list_id: i32,
        input: ItemInput,
    ) -> Result<Option<i32>, AppError> {
        let mut tables = self.tables.write().await;
        if tables.list_owned_by(owner, list_id).is_none() {
            return Ok(None);
        }
        let id = next_id(&mut tables.next_item_id);
        tables.items.insert(
            id,
            StoredItem {
                list_id,
                item: TodoItem {
                    id,
                    title: input.title,
                    description: input.description,
                    done: input.done,
                },
            },
        );
        Ok(Some(id))
    }

    async fn all_in_list(&self, owner: UserId, list_id: i32) -> Result<Vec<TodoItem>, AppError> {
        let tables = self.tables.read().await;
        if tables.list_owned_by(owner, list_id).is_none() {
            return Ok(Vec::new());
        }
        Ok(tables
            .items
            .values()
            .filter(|stored| stored.list_id == list_id)
            .map(|stored| stored.item.clone())
            .collect())
    }

    async fn get(&self, owner: UserId, item_id: i32) -> Result<Option<TodoItem>, AppError> {
        let tables = self.tables.read().await;
        if tables.item_owner(item_id) != Some(owner) {
            return Ok(None);
        }
        Ok(tables.items.get(&item_id).map(|stored| stored.item.clone()))
    }

    async fn update(
        &self,
        owner: UserId,
        item_id: i32,
        update: ItemUpdate,
    ) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.item_owner(item_id) != Some(owner) {
            return Ok(false);
        }
        let Some(stored) = tables.items.get_mut(&item_id) else {
            return Ok(false);
        };
        if let Some(title) = update.title {
            stored.item.title = title;
        }
        if let Some(description) = update.description {
            stored.item.description = Some(description);
        }
        if let Some(done) = update.done {
            stored.item.done = done;
        }
        Ok(true)
    }

    async fn delete(&self, owner: UserId, item_id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.item_owner(item_id) != Some(owner) {
            return Ok(false);
        }
        Ok(tables.items.remove(&item_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            name: "Test".into(),
            username: username.into(),
            password_hash: "hash".into(),
        }
    }

    fn list(title: &str) -> ListInput {
        ListInput {
            title: title.into(),
            description: None,
        }
    }

    #[actix_rt::test]
    async fn test_duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        let first = store.create_user(new_user("alice")).await.unwrap();
        assert_eq!(first, UserId(1));

        let second = store.create_user(new_user("alice")).await;
        assert!(matches!(second, Err(AppError::DuplicateUsername(_))));

        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, first);
        let by_id = store.find_by_id(first).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
        assert!(store.find_by_id(UserId(2)).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_item_owner_is_derived_from_list() {
        let store = MemoryStore::new();
        let owner = store.create_user(new_user("alice")).await.unwrap();
        let list_id = ListRepository::create(&store, owner, list("home")).await.unwrap();
        let item_id = ItemRepository::create(
            &store,
            owner,
            list_id,
            ItemInput {
                title: "dishes".into(),
                description: None,
                done: false,
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(
            store.owner_of(item_id, ResourceKind::Item).await.unwrap(),
            Some(owner)
        );
        assert_eq!(store.owner_of(99, ResourceKind::Item).await.unwrap(), None);
    }

    #[actix_rt::test]
    async fn test_mutations_require_owner_predicate() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("alice")).await.unwrap();
        let bob = store.create_user(new_user("bob")).await.unwrap();
        let list_id = ListRepository::create(&store, alice, list("home")).await.unwrap();

        let update = ListUpdate {
            title: Some("stolen".into()),
            description: None,
        };
        assert!(!ListRepository::update(&store, bob, list_id, update).await.unwrap());
        assert!(!ListRepository::delete(&store, bob, list_id).await.unwrap());

        let kept = ListRepository::get(&store, alice, list_id).await.unwrap().unwrap();
        assert_eq!(kept.title, "home");
    }

    #[actix_rt::test]
    async fn test_deleting_list_removes_items() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("alice")).await.unwrap();
        let list_id = ListRepository::create(&store, alice, list("home")).await.unwrap();
        let item_id = ItemRepository::create(
            &store,
            alice,
            list_id,
            ItemInput {
                title: "dishes".into(),
                description: None,
                done: false,
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert!(ListRepository::delete(&store, alice, list_id).await.unwrap());
        assert_eq!(store.owner_of(item_id, ResourceKind::Item).await.unwrap(), None);
    }
}
