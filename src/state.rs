use std::sync::Arc;

use crate::auth::{BcryptHasher, OwnershipGuard, PasswordHasher, TokenService};
use crate::config::{Config, Storage};
use crate::error::AppError;
use crate::repository::{
    ItemRepository, ListRepository, MemoryStore, OwnershipRepository, PostgresStore,
    UserRepository,
};

/// Everything the handlers share. All fields are read-only handles.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub lists: Arc<dyn ListRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub guard: OwnershipGuard,
    pub tokens: Arc<TokenService>,
    pub hasher: Arc<dyn PasswordHasher>,
}

impl AppState {
    /// Wires every port to one store implementing all of them.
    pub fn with_store<S>(
        store: Arc<S>,
        tokens: Arc<TokenService>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self
    where
        S: UserRepository + ListRepository + ItemRepository + OwnershipRepository + 'static,
    {
        Self {
            users: store.clone(),
            lists: store.clone(),
            items: store.clone(),
            guard: OwnershipGuard::new(store),
            tokens,
            hasher,
        }
    }

    pub fn in_memory(tokens: Arc<TokenService>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), tokens, hasher)
    }

    /// Builds the state described by `config`, connecting to Postgres when asked to.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let tokens = Arc::new(TokenService::from_config(config));
        let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::new(config.bcrypt_cost));

        match &config.storage {
            Storage::Postgres { database_url } => {
                let store = PostgresStore::connect(database_url).await?;
                log::info!("connected to postgres and applied migrations");
                Ok(Self::with_store(Arc::new(store), tokens, hasher))
            }
            Storage::Memory => {
                log::warn!("using in-memory storage; data is lost on shutdown");
                Ok(Self::in_memory(tokens, hasher))
            }
        }
    }
}
