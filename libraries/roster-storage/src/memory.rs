//! In-memory user service
//!
//! Same semantics as the Postgres service without a database. Used as a test
//! double for the HTTP layer.

use async_trait::async_trait;
use chrono::Utc;
use roster_core::{NewUser, Result, RosterError, User, UserChanges, UserId, UserService};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// User service backed by a map
#[derive(Debug, Default)]
pub struct MemoryUserService {
    users: RwLock<HashMap<UserId, User>>,
}

impl MemoryUserService {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserService for MemoryUserService {
    async fn get(&self, id: &UserId) -> Result<User> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RosterError::not_found(id))
    }

    async fn delete(&self, id: &UserId) -> Result<()> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RosterError::not_found(id))
    }

    async fn delete_all(&self) -> Result<u64> {
        let mut users = self.users.write().await;
        let deleted = users.len() as u64;
        users.clear();
        Ok(deleted)
    }

    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(id).ok_or_else(|| RosterError::not_found(id))?;
        user.apply(changes, Utc::now());
        Ok(user.clone())
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let user = User::from_new(new_user, Utc::now());
        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn create_then_get_returns_identical_record() {
        let store = MemoryUserService::new();

        let created = store.create(NewUser::new("Suzy", "Worker")).await.unwrap();
        let fetched = store.get(&created.id).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let store = MemoryUserService::new();

        let err = store
            .update(&UserId::generate(), UserChanges::new("Bob", "Baker"))
            .await
            .unwrap_err();

        assert!(matches!(err, RosterError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_keeps_identity_and_creation_time() {
        let store = MemoryUserService::new();
        let created = store.create(NewUser::new("Suzy", "Worker")).await.unwrap();

        let updated = store
            .update(&created.id, UserChanges::new("Suzy", "Manager"))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.occupation, "Manager");
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let store = MemoryUserService::new();
        let created = store.create(NewUser::new("Suzy", "Worker")).await.unwrap();

        store.delete(&created.id).await.unwrap();
        let err = store.delete(&created.id).await.unwrap_err();

        assert!(matches!(err, RosterError::NotFound(_)));
        assert!(matches!(
            store.get(&created.id).await,
            Err(RosterError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_all_counts_rows_and_succeeds_when_empty() {
        let store = MemoryUserService::new();
        store.create(NewUser::new("A", "x")).await.unwrap();
        store.create(NewUser::new("B", "y")).await.unwrap();

        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert!(store.is_empty().await);
        assert_eq!(store.delete_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let store = Arc::new(MemoryUserService::new());

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create(NewUser::new("Suzy", "Worker")).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().unwrap().id);
        }

        assert_eq!(ids.len(), 32);
        assert_eq!(store.len().await, 32);
    }

    #[test]
    fn has_no_pool() {
        assert!(MemoryUserService::new().pool_stats().is_none());
    }
}
