use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use guestbook::client::GuestbookClient;
use guestbook::entry::EntryRepoable;

pub const SESSION_COOKIE: &str = "guestbook_session";

/// The browser session's guestbook client, placed in request extensions.
#[derive(Clone)]
pub struct Session {
    pub id: String,
    pub client: Arc<GuestbookClient>,

    /// Created by this request, so the initial load already ran.
    pub fresh: bool,
}

struct SessionEntry {
    client: Arc<GuestbookClient>,
    last_seen: Instant,
}

/// One guestbook client per browser, bounded by `max_sessions`.
pub struct SessionStore {
    repo: Arc<dyn EntryRepoable>,
    max_sessions: usize,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(repo: Arc<dyn EntryRepoable>, max_sessions: usize) -> Self {
        Self {
            repo,
            max_sessions,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();

        Some(Session {
            id: id.to_string(),
            client: entry.client.clone(),
            fresh: false,
        })
    }

    /// Starts a session and runs its initial load.
    pub async fn create(&self) -> Session {
        let id = Uuid::now_v7().to_string();
        let client = Arc::new(GuestbookClient::new(self.repo.clone()));

        let active = {
            let mut sessions = self.sessions.write().await;
            if sessions.len() >= self.max_sessions {
                let oldest = sessions
                    .iter()
                    .min_by_key(|(_, s)| s.last_seen)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    info!("Evicting guestbook session {}", &oldest);
                    sessions.remove(&oldest);
                }
            }

            sessions.insert(
                id.clone(),
                SessionEntry {
                    client: client.clone(),
                    last_seen: Instant::now(),
                },
            );
            sessions.len()
        };

        info!("New guestbook session {} ({} active)", &id, active);
        client.load().await;

        Session {
            id,
            client,
            fresh: true,
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::time::sleep;

    use super::*;
    use guestbook::entry::{EntryTestRepo, test_entry};

    fn create_test_store(max_sessions: usize) -> (Arc<EntryTestRepo>, SessionStore) {
        let repo = Arc::new(EntryTestRepo::with_entries(vec![(
            test_entry(1, "A", "first"),
            "pw1",
        )]));
        let store = SessionStore::new(repo.clone(), max_sessions);
        (repo, store)
    }

    #[tokio::test]
    async fn test_create_loads_entries() {
        let (repo, store) = create_test_store(10);
        let session = store.create().await;

        let state = session.client.state().await;
        assert_eq!(state.entries.len(), 1);
        assert_eq!(repo.requests().await, 1);
    }

    #[tokio::test]
    async fn test_get_reuses_client() {
        let (repo, store) = create_test_store(10);
        let session = store.create().await;
        assert!(session.fresh);

        let found = store.get(&session.id).await.unwrap();
        assert!(Arc::ptr_eq(&found.client, &session.client));
        assert!(!found.fresh);
        assert_eq!(repo.requests().await, 1);

        assert!(store.get("unknown").await.is_none());
    }

    #[tokio::test]
    async fn test_evicts_least_recently_seen() {
        let (_repo, store) = create_test_store(2);
        let first = store.create().await;
        sleep(Duration::from_millis(5)).await;
        let second = store.create().await;
        sleep(Duration::from_millis(5)).await;

        // Touch the first so the second becomes the oldest
        assert!(store.get(&first.id).await.is_some());
        sleep(Duration::from_millis(5)).await;

        let third = store.create().await;
        assert_eq!(store.len().await, 2);
        assert!(store.get(&first.id).await.is_some());
        assert!(store.get(&second.id).await.is_none());
        assert!(store.get(&third.id).await.is_some());
    }
}
