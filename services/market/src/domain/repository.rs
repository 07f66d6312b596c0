use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use campus_domain::id::{ProductId, UserId};
use campus_domain::product::ProductStatus;

use crate::domain::types::{NewUser, Product, SearchQuery, User};
use crate::error::MarketError;

/// Durable storage for one record collection, keyed by id.
///
/// The contract is whole-collection: `load` returns every record, `flush`
/// replaces every record. Implementations may skip individual unreadable
/// records on load but must report an unreadable collection as an error.
/// Neither case may lose data on a later flush.
pub trait CollectionStore<R>: Send + Sync {
    fn load(&self) -> anyhow::Result<BTreeMap<String, R>>;
    fn flush(&self, records: &BTreeMap<String, R>) -> anyhow::Result<()>;

    /// Ids held by records that `load` skipped but the store still keeps.
    /// New records must not reuse them.
    fn reserved_keys(&self) -> anyhow::Result<BTreeSet<String>> {
        Ok(BTreeSet::new())
    }
}

impl<R, S> CollectionStore<R> for Box<S>
where
    S: CollectionStore<R> + ?Sized,
{
    fn load(&self) -> anyhow::Result<BTreeMap<String, R>> {
        (**self).load()
    }

    fn flush(&self, records: &BTreeMap<String, R>) -> anyhow::Result<()> {
        (**self).flush(records)
    }

    fn reserved_keys(&self) -> anyhow::Result<BTreeSet<String>> {
        (**self).reserved_keys()
    }
}

/// The user directory: sole owner of user records.
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `DuplicateIdentity` when the username
    /// or the email is already taken (exact, case-sensitive).
    fn create(&self, new_user: NewUser) -> Result<User, MarketError>;

    /// Exact username, exact password, active accounts only.
    fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, MarketError>;

    fn find_by_id(&self, id: &UserId) -> Result<Option<User>, MarketError>;

    fn count(&self) -> Result<usize, MarketError>;
}

/// The catalog: sole owner of listing records.
pub trait ProductRepository: Send + Sync {
    /// Next free id in the listing sequence.
    fn next_id(&self) -> Result<ProductId, MarketError>;

    /// Insert a listing. Returns `false` (and stores nothing) if the id is taken.
    fn add(&self, product: Product) -> Result<bool, MarketError>;

    fn get(&self, id: &ProductId) -> Result<Option<Product>, MarketError>;

    fn get_by_status(&self, status: ProductStatus) -> Result<Vec<Product>, MarketError>;

    /// Every listing of `seller_id`, whatever its status.
    fn list_by_seller(&self, seller_id: &UserId) -> Result<Vec<Product>, MarketError>;

    /// On-sale listings matching `query`, newest first.
    fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, MarketError>;

    /// Pending -> on sale. `Ok(true)` also when already on sale, `Ok(false)`
    /// for an unknown id, `InvalidTransition` for sold/removed listings.
    fn approve(&self, id: &ProductId) -> Result<bool, MarketError>;

    /// On sale -> sold. `Ok(false)` for an unknown id.
    fn mark_sold(&self, id: &ProductId) -> Result<bool, MarketError>;

    /// On sale -> removed. `Ok(false)` for an unknown id.
    fn remove(&self, id: &ProductId) -> Result<bool, MarketError>;

    /// Bump the view counter and return the updated listing.
    fn record_view(&self, id: &ProductId) -> Result<Option<Product>, MarketError>;
}

impl<T: UserRepository + ?Sized> UserRepository for Arc<T> {
    fn create(&self, new_user: NewUser) -> Result<User, MarketError> {
        (**self).create(new_user)
    }

    fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, MarketError> {
        (**self).find_by_credentials(username, password)
    }

    fn find_by_id(&self, id: &UserId) -> Result<Option<User>, MarketError> {
        (**self).find_by_id(id)
    }

    fn count(&self) -> Result<usize, MarketError> {
        (**self).count()
    }
}

impl<T: ProductRepository + ?Sized> ProductRepository for Arc<T> {
    fn next_id(&self) -> Result<ProductId, MarketError> {
        (**self).next_id()
    }

    fn add(&self, product: Product) -> Result<bool, MarketError> {
        (**self).add(product)
    }

    fn get(&self, id: &ProductId) -> Result<Option<Product>, MarketError> {
        (**self).get(id)
    }

    fn get_by_status(&self, status: ProductStatus) -> Result<Vec<Product>, MarketError> {
        (**self).get_by_status(status)
    }

    fn list_by_seller(&self, seller_id: &UserId) -> Result<Vec<Product>, MarketError> {
        (**self).list_by_seller(seller_id)
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, MarketError> {
        (**self).search(query)
    }

    fn approve(&self, id: &ProductId) -> Result<bool, MarketError> {
        (**self).approve(id)
    }

    fn mark_sold(&self, id: &ProductId) -> Result<bool, MarketError> {
        (**self).mark_sold(id)
    }

    fn remove(&self, id: &ProductId) -> Result<bool, MarketError> {
        (**self).remove(id)
    }

    fn record_view(&self, id: &ProductId) -> Result<Option<Product>, MarketError> {
        (**self).record_view(id)
    }
}
