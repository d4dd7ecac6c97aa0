use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use snafu::ResultExt;
use tracing::debug;
use urlencoding::encode;

use crate::error::{HttpClientSnafu, HttpResponseParseSnafu};
use crate::{Error, Result};
use dto::entry::{DeleteEntryDto, EntryDto, EntryId, NewEntryDto, UpdateEntryDto};

/// Remote guestbook entries, owned by the backend API.
#[async_trait]
pub trait EntryRepoable: Send + Sync {
    async fn list(&self) -> Result<Vec<EntryDto>>;

    async fn create(&self, data: &NewEntryDto) -> Result<EntryDto>;

    async fn update(&self, id: &EntryId, data: &UpdateEntryDto) -> Result<EntryDto>;

    async fn delete(&self, id: &EntryId, data: &DeleteEntryDto) -> Result<()>;
}

pub struct EntryRepo {
    api_url: String,
    client: Client,
}

impl EntryRepo {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/api/guestbook", &self.api_url)
    }

    fn entry_url(&self, id: &EntryId) -> String {
        format!("{}/api/guestbook/{}", &self.api_url, encode(&id.to_string()))
    }
}

#[async_trait]
impl EntryRepoable for EntryRepo {
    async fn list(&self) -> Result<Vec<EntryDto>> {
        let response = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .context(HttpClientSnafu {
                msg: "Unable to list guestbook entries",
            })?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "Unable to list guestbook entries").await);
        }

        let entries = response
            .json::<Vec<EntryDto>>()
            .await
            .context(HttpResponseParseSnafu {
                msg: "Unable to parse guestbook entries",
            })?;

        Ok(entries)
    }

    async fn create(&self, data: &NewEntryDto) -> Result<EntryDto> {
        let response = self
            .client
            .post(self.collection_url())
            .json(data)
            .send()
            .await
            .context(HttpClientSnafu {
                msg: "Unable to create guestbook entry",
            })?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "Unable to create guestbook entry").await);
        }

        let entry = response
            .json::<EntryDto>()
            .await
            .context(HttpResponseParseSnafu {
                msg: "Unable to parse created guestbook entry",
            })?;

        Ok(entry)
    }

    async fn update(&self, id: &EntryId, data: &UpdateEntryDto) -> Result<EntryDto> {
        let response = self
            .client
            .put(self.entry_url(id))
            .json(data)
            .send()
            .await
            .context(HttpClientSnafu {
                msg: "Unable to update guestbook entry",
            })?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "Unable to update guestbook entry").await);
        }

        let entry = response
            .json::<EntryDto>()
            .await
            .context(HttpResponseParseSnafu {
                msg: "Unable to parse updated guestbook entry",
            })?;

        Ok(entry)
    }

    async fn delete(&self, id: &EntryId, data: &DeleteEntryDto) -> Result<()> {
        let response = self
            .client
            .delete(self.entry_url(id))
            .json(data)
            .send()
            .await
            .context(HttpClientSnafu {
                msg: "Unable to delete guestbook entry",
            })?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "Unable to delete guestbook entry").await);
        }

        Ok(())
    }
}

/// 403 is the backend's password mismatch signal, every other status is a
/// plain failure.
async fn handle_response_error(response: Response, msg: &str) -> Error {
    let status = response.status();
    if status == StatusCode::FORBIDDEN {
        return Error::Forbidden;
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), body = body.as_str(), "{}", msg);

    Error::Status {
        msg: msg.to_string(),
        status: status.as_u16(),
    }
}

#[cfg(any(test, feature = "test"))]
pub use test_repo::{EntryTestRepo, test_entry};

#[cfg(any(test, feature = "test"))]
mod test_repo {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use tokio::sync::Mutex;

    use super::EntryRepoable;
    use crate::{Error, Result};
    use dto::entry::{DeleteEntryDto, EntryDto, EntryId, NewEntryDto, UpdateEntryDto};

    /// Builds an entry with a fixed timestamp derived from the id.
    pub fn test_entry(id: i64, name: &str, message: &str) -> EntryDto {
        EntryDto {
            id: EntryId::Number(id),
            name: name.to_string(),
            message: message.to_string(),
            created_at: DateTime::<Utc>::from_timestamp(1_714_557_600 + id, 0)
                .unwrap_or_default(),
        }
    }

    struct TestStore {
        // Newest first, each with its password
        records: Vec<(EntryDto, String)>,
        next_id: i64,
        failing: bool,
        requests: usize,
    }

    /// In-memory backend with the same password rules as the real API.
    pub struct EntryTestRepo {
        store: Mutex<TestStore>,
    }

    impl EntryTestRepo {
        pub fn new() -> Self {
            Self::with_entries(Vec::new())
        }

        pub fn with_entries(records: Vec<(EntryDto, &str)>) -> Self {
            let next_id = records
                .iter()
                .filter_map(|(entry, _)| match entry.id {
                    EntryId::Number(n) => Some(n),
                    EntryId::Text(_) => None,
                })
                .max()
                .unwrap_or(0)
                + 1;

            Self {
                store: Mutex::new(TestStore {
                    records: records
                        .into_iter()
                        .map(|(entry, password)| (entry, password.to_string()))
                        .collect(),
                    next_id,
                    failing: false,
                    requests: 0,
                }),
            }
        }

        /// Every request fails with a 500 while set.
        pub async fn set_failing(&self, failing: bool) {
            self.store.lock().await.failing = failing;
        }

        /// Number of requests received so far.
        pub async fn requests(&self) -> usize {
            self.store.lock().await.requests
        }

        pub async fn entries(&self) -> Vec<EntryDto> {
            let store = self.store.lock().await;
            store.records.iter().map(|(entry, _)| entry.clone()).collect()
        }
    }

    impl Default for EntryTestRepo {
        fn default() -> Self {
            Self::new()
        }
    }

    fn server_error() -> Error {
        Error::Status {
            msg: "Test backend failure".to_string(),
            status: 500,
        }
    }

    fn not_found() -> Error {
        Error::Status {
            msg: "Entry not found".to_string(),
            status: 404,
        }
    }

    #[async_trait]
    impl EntryRepoable for EntryTestRepo {
        async fn list(&self) -> Result<Vec<EntryDto>> {
            let mut store = self.store.lock().await;
            store.requests += 1;
            if store.failing {
                return Err(server_error());
            }

            Ok(store.records.iter().map(|(entry, _)| entry.clone()).collect())
        }

        async fn create(&self, data: &NewEntryDto) -> Result<EntryDto> {
            let mut store = self.store.lock().await;
            store.requests += 1;
            if store.failing {
                return Err(server_error());
            }

            let entry = EntryDto {
                id: EntryId::Number(store.next_id),
                name: data.name.clone(),
                message: data.message.clone(),
                created_at: Utc::now(),
            };
            store.next_id += 1;
            store
                .records
                .insert(0, (entry.clone(), data.password.clone()));

            Ok(entry)
        }

        async fn update(&self, id: &EntryId, data: &UpdateEntryDto) -> Result<EntryDto> {
            let mut store = self.store.lock().await;
            store.requests += 1;
            if store.failing {
                return Err(server_error());
            }

            let Some((entry, password)) = store.records.iter_mut().find(|(e, _)| &e.id == id)
            else {
                return Err(not_found());
            };

            if *password != data.password {
                return Err(Error::Forbidden);
            }

            entry.message = data.message.clone();
            Ok(entry.clone())
        }

        async fn delete(&self, id: &EntryId, data: &DeleteEntryDto) -> Result<()> {
            let mut store = self.store.lock().await;
            store.requests += 1;
            if store.failing {
                return Err(server_error());
            }

            let Some(pos) = store.records.iter().position(|(e, _)| &e.id == id) else {
                return Err(not_found());
            };

            if store.records[pos].1 != data.password {
                return Err(Error::Forbidden);
            }

            store.records.remove(pos);
            Ok(())
        }
    }
}
