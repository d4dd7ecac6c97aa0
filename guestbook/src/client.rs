use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info};
use validator::Validate;

use crate::Error;
use crate::entry::EntryRepoable;
use crate::state::{
    CREATE_FAILED, ClientState, DELETE_FAILED, DeleteRequest, EditRequest, EntryForm, LOAD_FAILED,
    Outcome, UPDATE_FAILED,
};
use dto::entry::{DeleteEntryDto, EntryDto, NewEntryDto, UpdateEntryDto};

/// Local view of the guestbook kept in sync with the backend.
///
/// Requests run without holding the state lock. Each response is applied
/// when it arrives, so overlapping requests settle in completion order.
pub struct GuestbookClient {
    repo: Arc<dyn EntryRepoable>,
    state: RwLock<ClientState>,
}

impl GuestbookClient {
    pub fn new(repo: Arc<dyn EntryRepoable>) -> Self {
        Self {
            repo,
            state: RwLock::new(ClientState::default()),
        }
    }

    /// Copy of the current state for rendering.
    pub async fn state(&self) -> ClientState {
        self.state.read().await.clone()
    }

    pub async fn find_entry(&self, id: &str) -> Option<EntryDto> {
        self.state.read().await.find_entry(id).cloned()
    }

    /// Replaces the whole list with the backend's. A successful load also
    /// clears a banner left by an earlier failed load.
    pub async fn load(&self) -> Outcome {
        match self.repo.list().await {
            Ok(entries) => {
                let mut state = self.state.write().await;
                state.replace_entries(entries);
                if state.error.as_deref() == Some(LOAD_FAILED) {
                    state.error = None;
                }
                Outcome::Applied
            }
            Err(e) => {
                error!("Error fetching guestbook entries: {}", e);
                self.state.write().await.set_error(LOAD_FAILED);
                Outcome::Failed
            }
        }
    }

    pub async fn submit(&self, form: EntryForm) -> Outcome {
        self.state.write().await.inputs = form.clone();

        if form.validate().is_err() {
            return Outcome::Incomplete;
        }

        let data = NewEntryDto {
            name: form.name,
            message: form.message,
            password: form.password,
        };

        match self.repo.create(&data).await {
            Ok(entry) => {
                let mut state = self.state.write().await;
                state.prepend_entry(entry);
                state.clear_inputs();
                Outcome::Applied
            }
            Err(e) => {
                error!("Error adding guestbook entry: {}", e);
                self.state.write().await.set_error(CREATE_FAILED);
                Outcome::Failed
            }
        }
    }

    pub async fn edit(&self, req: EditRequest) -> Outcome {
        let data = UpdateEntryDto {
            message: req.message,
            password: req.password,
        };

        match self.repo.update(&req.id, &data).await {
            Ok(entry) => {
                self.state.write().await.replace_entry(entry);
                Outcome::Applied
            }
            Err(Error::Forbidden) => {
                info!("Password mismatch while updating entry {}", &req.id);
                Outcome::PasswordMismatch
            }
            Err(e) => {
                error!("Error updating guestbook entry: {}", e);
                self.state.write().await.set_error(UPDATE_FAILED);
                Outcome::Failed
            }
        }
    }

    pub async fn delete(&self, req: DeleteRequest) -> Outcome {
        let data = DeleteEntryDto {
            password: req.password,
        };

        match self.repo.delete(&req.id, &data).await {
            Ok(_) => {
                self.state.write().await.remove_entry(&req.id);
                Outcome::Applied
            }
            Err(Error::Forbidden) => {
                info!("Password mismatch while deleting entry {}", &req.id);
                Outcome::PasswordMismatch
            }
            Err(e) => {
                error!("Error deleting guestbook entry: {}", e);
                self.state.write().await.set_error(DELETE_FAILED);
                Outcome::Failed
            }
        }
    }
}
