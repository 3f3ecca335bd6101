use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ticketpos_core::BusinessId;

use crate::error::ServiceError;

/// Business-isolated key/value store abstraction.
///
/// Every read and write is scoped to one business; a key stored under one
/// business is invisible to all others. A store that cannot serve a call
/// says so with a `ServiceError` instead of dropping the write.
pub trait BusinessStore<K, V>: Send + Sync {
    fn get(&self, business_id: BusinessId, key: &K) -> Result<Option<V>, ServiceError>;
    fn upsert(&self, business_id: BusinessId, key: K, value: V) -> Result<(), ServiceError>;
    /// Remove a record, returning it if it existed.
    fn remove(&self, business_id: BusinessId, key: &K) -> Result<Option<V>, ServiceError>;
    fn list(&self, business_id: BusinessId) -> Result<Vec<V>, ServiceError>;
    fn clear_business(&self, business_id: BusinessId) -> Result<(), ServiceError>;
}

impl<K, V, S> BusinessStore<K, V> for Arc<S>
where
    S: BusinessStore<K, V> + ?Sized,
{
    fn get(&self, business_id: BusinessId, key: &K) -> Result<Option<V>, ServiceError> {
        (**self).get(business_id, key)
    }

    fn upsert(&self, business_id: BusinessId, key: K, value: V) -> Result<(), ServiceError> {
        (**self).upsert(business_id, key, value)
    }

    fn remove(&self, business_id: BusinessId, key: &K) -> Result<Option<V>, ServiceError> {
        (**self).remove(business_id, key)
    }

    fn list(&self, business_id: BusinessId) -> Result<Vec<V>, ServiceError> {
        (**self).list(business_id)
    }

    fn clear_business(&self, business_id: BusinessId) -> Result<(), ServiceError> {
        (**self).clear_business(business_id)
    }
}

type Records<K, V> = HashMap<BusinessId, HashMap<K, V>>;

/// In-memory store for tests/dev, one map of records per business.
#[derive(Debug)]
pub struct InMemoryBusinessStore<K, V> {
    records: RwLock<Records<K, V>>,
}

impl<K, V> InMemoryBusinessStore<K, V> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Records<K, V>>, ServiceError> {
        self.records
            .read()
            .map_err(|_| ServiceError::backend("business store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Records<K, V>>, ServiceError> {
        self.records
            .write()
            .map_err(|_| ServiceError::backend("business store lock poisoned"))
    }

    /// Poison the lock the way a writer panicking mid-update would.
    #[cfg(test)]
    pub(crate) fn poison(&self)
    where
        K: Send + Sync,
        V: Send + Sync,
    {
        std::thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _guard = self.records.write();
                    panic!("writer died while holding the lock");
                })
                .join();
        });
    }
}

impl<K, V> Default for InMemoryBusinessStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> BusinessStore<K, V> for InMemoryBusinessStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, business_id: BusinessId, key: &K) -> Result<Option<V>, ServiceError> {
        Ok(self
            .read()?
            .get(&business_id)
            .and_then(|records| records.get(key))
            .cloned())
    }

    fn upsert(&self, business_id: BusinessId, key: K, value: V) -> Result<(), ServiceError> {
        self.write()?
            .entry(business_id)
            .or_default()
            .insert(key, value);
        Ok(())
    }

    fn remove(&self, business_id: BusinessId, key: &K) -> Result<Option<V>, ServiceError> {
        Ok(self
            .write()?
            .get_mut(&business_id)
            .and_then(|records| records.remove(key)))
    }

    fn list(&self, business_id: BusinessId) -> Result<Vec<V>, ServiceError> {
        Ok(self
            .read()?
            .get(&business_id)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    fn clear_business(&self, business_id: BusinessId) -> Result<(), ServiceError> {
        self.write()?.remove(&business_id);
        Ok(())
    }
}
