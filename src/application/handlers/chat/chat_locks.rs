//! Per-chat serialization of inbound actions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::TelegramId;

/// Entries above this count trigger pruning of unused locks.
const PRUNE_THRESHOLD: usize = 1024;

/// Hands out one async lock per chat.
///
/// Holding the guard for the whole handling of an action guarantees that a
/// chat's actions are processed one at a time, while different chats run
/// concurrently.
#[derive(Debug, Default)]
pub struct ChatLocks {
    locks: Mutex<HashMap<TelegramId, Arc<AsyncMutex<()>>>>,
}

impl ChatLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until the chat is free and returns its guard.
    pub async fn acquire(&self, chat: TelegramId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            if locks.len() > PRUNE_THRESHOLD {
                // Only the map holds a reference: nobody is waiting or running.
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks.entry(chat).or_default().clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_chat_waits_for_previous_guard() {
        let locks = Arc::new(ChatLocks::new());
        let chat = TelegramId::new(1);

        let guard = locks.acquire(chat).await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(chat).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish once the guard is dropped")
            .unwrap();
    }

    #[tokio::test]
    async fn different_chats_do_not_block() {
        let locks = ChatLocks::new();
        let _first = locks.acquire(TelegramId::new(1)).await;
        let second = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(TelegramId::new(2)),
        )
        .await;
        assert!(second.is_ok());
        assert_eq!(tracked(&locks), 2);
    }

    #[tokio::test]
    async fn idle_locks_are_pruned_past_threshold() {
        let locks = ChatLocks::new();
        let held = locks.acquire(TelegramId::new(-1)).await;
        for chat in 0..PRUNE_THRESHOLD as i64 {
            drop(locks.acquire(TelegramId::new(chat)).await);
        }

        drop(locks.acquire(TelegramId::new(i64::MAX)).await);

        // The held chat and the newest one survive
        assert_eq!(tracked(&locks), 2);
        drop(held);
    }

    fn tracked(locks: &ChatLocks) -> usize {
        locks.locks.lock().unwrap().len()
    }
}
