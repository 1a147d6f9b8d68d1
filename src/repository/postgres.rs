//! PostgreSQL store built on a `sqlx` connection pool.
//!
//! Lists carry their owner in `todo_lists.user_id`; items only reference their
//! list, so every item query joins through `todo_lists` to reach the owner.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{ItemRepository, ListRepository, OwnershipRepository, UserRepository};
use crate::error::AppError;
use crate::models::{
    ItemInput, ItemUpdate, ListInput, ListUpdate, NewUser, ResourceKind, TodoItem, TodoList, User,
    UserId,
};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and applies the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn create_user(&self, user: NewUser) -> Result<UserId, AppError> {
        let (id,) = sqlx::query_as::<_, (i32,)>(
            "INSERT INTO users (name, username, password_hash) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(UserId(id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, username, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl OwnershipRepository for PostgresStore {
    async fn owner_of(
        &self,
        resource_id: i32,
        kind: ResourceKind,
    ) -> Result<Option<UserId>, AppError> {
        let sql = match kind {
            ResourceKind::List => "SELECT user_id FROM todo_lists WHERE id = $1",
            ResourceKind::Item => {
                "SELECT l.user_id FROM todo_items i \
                 JOIN todo_lists l ON l.id = i.list_id WHERE i.id = $1"
            }
        };
        let owner = sqlx::query_as::<_, (i32,)>(sql)
            .bind(resource_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(owner.map(|(id,)| UserId(id)))
    }
}

#[async_trait]
impl ListRepository for PostgresStore {
    async fn create(&self, owner: UserId, input: ListInput) -> Result<i32, AppError> {
        let (id,) = sqlx::query_as::<_, (i32,)>(
            "INSERT INTO todo_lists (user_id, title, description) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(owner)
        .bind(&input.title)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn all(&self, owner: UserId) -> Result<Vec<TodoList>, AppError> {
        let lists = sqlx::query_as::<_, TodoList>(
            "SELECT id, title, description FROM todo_lists WHERE user_id = $1 ORDER BY id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(lists)
    }

    async fn get(&self, owner: UserId, list_id: i32) -> Result<Option<TodoList>, AppError> {
        let list = sqlx::query_as::<_, TodoList>(
            "SELECT id, title, description FROM todo_lists WHERE id = $1 AND user_id = $2",
        )
        .bind(list_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(list)
    }

    async fn update(
        &self,
        owner: UserId,
        list_id: i32,
        update: ListUpdate,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE todo_lists \
             SET title = COALESCE($1, title), description = COALESCE($2, description) \
             WHERE id = $3 AND user_id = $4",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(list_id)
        .bind(owner)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, owner: UserId, list_id: i32) -> Result<bool, AppError> {
        // todo_items rows go with the list through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM todo_lists WHERE id = $1 AND user_id = $2")
            .bind(list_id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ItemRepository for PostgresStore {
    async fn create(
        &self,
        owner: UserId,
        list_id: i32,
        input: ItemInput,
    ) -> Result<Option<i32>, AppError> {
        let id = sqlx::query_as::<_, (i32,)>(
            "INSERT INTO todo_items (list_id, title, description, done) \
             SELECT l.id, $3, $4, $5 FROM todo_lists l WHERE l.id = $1 AND l.user_id = $2 \
             RETURNING id",
        )
        .bind(list_id)
        .bind(owner)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.done)
        .fetch_optional(&self.pool)
        .await?;
        Ok(id.map(|(id,)| id))
    }

    async fn all_in_list(&self, owner: UserId, list_id: i32) -> Result<Vec<TodoItem>, AppError> {
        let items = sqlx::query_as::<_, TodoItem>(
            "SELECT i.id, i.title, i.description, i.done FROM todo_items i \
             JOIN todo_lists l ON l.id = i.list_id \
             WHERE i.list_id = $1 AND l.user_id = $2 ORDER BY i.id",
        )
        .bind(list_id)
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn get(&self, owner: UserId, item_id: i32) -> Result<Option<TodoItem>, AppError> {
        let item = sqlx::query_as::<_, TodoItem>(
            "SELECT i.id, i.title, i.description, i.done FROM todo_items i \
             JOIN todo_lists l ON l.id = i.list_id \
             WHERE i.id = $1 AND l.user_id = $2",
        )
        .bind(item_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn update(
        &self,
        owner: UserId,
        item_id: i32,
        update: ItemUpdate,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE todo_items i \
             SET title = COALESCE($1, i.title), \
                 description = COALESCE($2, i.description), \
                 done = COALESCE($3, i.done) \
             FROM todo_lists l \
             WHERE l.id = i.list_id AND i.id = $4 AND l.user_id = $5",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.done)
        .bind(item_id)
        .bind(owner)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, owner: UserId, item_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM todo_items i USING todo_lists l \
             WHERE l.id = i.list_id AND i.id = $1 AND l.user_id = $2",
        )
        .bind(item_id)
        .bind(owner)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
