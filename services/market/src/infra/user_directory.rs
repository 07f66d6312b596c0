use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use anyhow::Context as _;
use tracing::{error, info, warn};

use campus_domain::id::{UserId, next_sequence_id};
use campus_domain::time::Timestamp;
use campus_domain::user::{DEFAULT_CREDIT_SCORE, UserStatus};

use crate::domain::repository::{CollectionStore, UserRepository};
use crate::domain::types::{NewUser, User};
use crate::error::MarketError;
use crate::infra::record::UserRecord;

/// In-memory user collection backed by a whole-collection store.
///
/// The lock is held across mutate-and-flush, so writes are serialized and the
/// store always receives a consistent snapshot.
pub struct UserDirectory<S> {
    store: S,
    /// Ids of records the store kept but could not read.
    reserved: BTreeSet<String>,
    users: Mutex<BTreeMap<UserId, User>>,
}

impl<S: CollectionStore<UserRecord>> UserDirectory<S> {
    /// Load every user from `store`. An unreadable collection is logged and
    /// treated as empty; the store keeps the original out of harm's way.
    pub fn open(store: S) -> Self {
        let users = match store.load() {
            Ok(records) => records
                .into_values()
                .map(|record| {
                    let user = User::from(record);
                    (user.id.clone(), user)
                })
                .collect(),
            Err(e) => {
                error!(error = ?e, "failed to load users, starting with an empty directory");
                BTreeMap::new()
            }
        };
        info!(count = users.len(), "user directory loaded");
        let reserved = store.reserved_keys().unwrap_or_else(|e| {
            error!(error = ?e, "failed to read reserved user ids");
            BTreeSet::new()
        });
        if !reserved.is_empty() {
            warn!(count = reserved.len(), "unreadable users kept on disk");
        }
        Self {
            store,
            reserved,
            users: Mutex::new(users),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<UserId, User>>, MarketError> {
        self.users
            .lock()
            .map_err(|_| MarketError::poisoned("user directory"))
    }

    fn flush(&self, users: &BTreeMap<UserId, User>) -> Result<(), MarketError> {
        let records: BTreeMap<String, UserRecord> = users
            .iter()
            .map(|(id, user)| (id.to_string(), UserRecord::from(user)))
            .collect();
        self.store.flush(&records).context("flush users")?;
        Ok(())
    }
}

impl<S: CollectionStore<UserRecord>> UserRepository for UserDirectory<S> {
    fn create(&self, new_user: NewUser) -> Result<User, MarketError> {
        let mut users = self.lock()?;
        let taken = users
            .values()
            .any(|u| u.username == new_user.username || u.email == new_user.email);
        if taken {
            return Err(MarketError::DuplicateIdentity);
        }

        let id = UserId::from(next_sequence_id(
            users
                .keys()
                .map(UserId::as_str)
                .chain(self.reserved.iter().map(String::as_str)),
        ));
        let user = User {
            id: id.clone(),
            username: new_user.username,
            password: new_user.password,
            email: new_user.email,
            campus: new_user.campus,
            role: new_user.role,
            credit_score: DEFAULT_CREDIT_SCORE,
            status: UserStatus::Active,
            registered_at: Some(Timestamp::now()),
        };
        users.insert(id.clone(), user.clone());

        if let Err(e) = self.flush(&users) {
            users.remove(&id);
            return Err(e);
        }
        info!(user_id = %id, role = %user.role, "user created");
        Ok(user)
    }

    fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, MarketError> {
        let users = self.lock()?;
        Ok(users
            .values()
            .find(|u| u.username == username && u.password == password && u.status.is_active())
            .cloned())
    }

    fn find_by_id(&self, id: &UserId) -> Result<Option<User>, MarketError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn count(&self) -> Result<usize, MarketError> {
        Ok(self.lock()?.len())
    }
}
