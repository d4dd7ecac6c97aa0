use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct EntryParams {
    pub entry_id: String,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct EditEntryFormData {
    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub password: String,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct DeleteEntryFormData {
    #[serde(default)]
    pub password: String,
}
