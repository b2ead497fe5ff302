use std::sync::Arc;

use dashmap::DashMap;
use sea_orm::DatabaseConnection;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{config::AppConfig, services::notifier::WebhookNotifier};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub notifier: WebhookNotifier,
    pub checkout_locks: UserLocks,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            orm,
            config: Arc::new(config),
            notifier: WebhookNotifier::new(),
            checkout_locks: UserLocks::default(),
        }
    }
}

/// One async mutex per user, so two checkouts for the same account never interleave.
/// Entries are dropped again once nobody holds or waits for them.
#[derive(Clone, Default)]
pub struct UserLocks {
    inner: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub async fn acquire(&self, user_id: Uuid) -> UserLockGuard {
        let lock = self.inner.entry(user_id).or_default().value().clone();
        let guard = lock.lock_owned().await;
        UserLockGuard {
            guard: Some(guard),
            user_id,
            locks: self.inner.clone(),
        }
    }
}

pub struct UserLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    user_id: Uuid,
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl Drop for UserLockGuard {
    fn drop(&mut self) {
        self.guard.take();
        // Only the map's own handle left: no holder and no waiter.
        self.locks
            .remove_if(&self.user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn released_locks_are_evicted() {
        let locks = UserLocks::default();
        let user = Uuid::new_v4();

        let guard = locks.acquire(user).await;
        assert_eq!(locks.inner.len(), 1);
        drop(guard);
        assert!(locks.inner.is_empty());
    }

    #[tokio::test]
    async fn waiting_checkout_keeps_the_entry() {
        let locks = UserLocks::default();
        let user = Uuid::new_v4();

        let first = locks.acquire(user).await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _second = locks.acquire(user).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(first);
        assert_eq!(locks.inner.len(), 1);
        waiter.await.unwrap();
        assert!(locks.inner.is_empty());
    }
}
