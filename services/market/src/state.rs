use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{DEFAULT_SESSION_IDLE_TTL, MarketConfig};
use crate::domain::repository::CollectionStore;
use crate::infra::catalog::Catalog;
use crate::infra::record::{ProductRecord, UserRecord};
use crate::infra::store::{JsonFileStore, MemoryStore};
use crate::infra::user_directory::UserDirectory;
use crate::usecase::auth::AuthService;
use crate::usecase::catalog::CatalogService;

pub type SharedUsers = Arc<UserDirectory<Box<dyn CollectionStore<UserRecord>>>>;
pub type SharedProducts = Arc<Catalog<Box<dyn CollectionStore<ProductRecord>>>>;

/// Shared application state passed to every handler via axum `State`.
///
/// One user directory and one catalog are built per process; both services
/// hold handles to the same instances.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<SharedUsers>>,
    pub catalog: Arc<CatalogService<SharedProducts, SharedUsers>>,
    /// `None` when running without persistence.
    pub data_dir: Option<PathBuf>,
}

impl AppState {
    /// Build state over arbitrary stores.
    pub fn from_stores(
        users: Box<dyn CollectionStore<UserRecord>>,
        products: Box<dyn CollectionStore<ProductRecord>>,
        data_dir: Option<PathBuf>,
        session_idle_ttl: Duration,
    ) -> Self {
        let users: SharedUsers = Arc::new(UserDirectory::open(users));
        let products: SharedProducts = Arc::new(Catalog::open(products));
        Self {
            auth: Arc::new(AuthService::with_idle_ttl(users.clone(), session_idle_ttl)),
            catalog: Arc::new(CatalogService::new(products, users)),
            data_dir,
        }
    }

    /// Load both collections from JSON documents under the configured
    /// data directory.
    pub fn open(config: &MarketConfig) -> Self {
        Self::from_stores(
            Box::new(JsonFileStore::new(config.users_file())),
            Box::new(JsonFileStore::new(config.products_file())),
            Some(config.data_dir.clone()),
            config.session_idle_ttl(),
        )
    }

    /// Empty, volatile state.
    pub fn in_memory() -> Self {
        Self::from_stores(
            Box::new(MemoryStore::<UserRecord>::new()),
            Box::new(MemoryStore::<ProductRecord>::new()),
            None,
            DEFAULT_SESSION_IDLE_TTL,
        )
    }
}
