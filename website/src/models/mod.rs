mod params;

use chrono::{DateTime, Local, Utc};
use urlencoding::encode;

use dto::entry::EntryDto;

pub use params::{DeleteEntryFormData, EditEntryFormData, EntryParams};

pub struct TemplateData {
    pub title: String,
}

impl TemplateData {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }
}

/// Entry as shown in pages.
#[derive(Clone)]
pub struct EntryView {
    pub id: String,
    pub path_id: String,
    pub name: String,
    pub message: String,
    pub created_at: String,
}

impl From<EntryDto> for EntryView {
    fn from(entry: EntryDto) -> Self {
        let id = entry.id.to_string();
        Self {
            path_id: encode(&id).to_string(),
            id,
            name: entry.name,
            message: entry.message,
            created_at: format_local(&entry.created_at),
        }
    }
}

pub fn format_local(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dto::entry::EntryId;

    #[test]
    fn test_entry_view_path_id() {
        let entry = EntryDto {
            id: EntryId::from("a b/c"),
            name: "A".to_string(),
            message: "hi".to_string(),
            created_at: Utc::now(),
        };
        let view = EntryView::from(entry);

        assert_eq!(view.id, "a b/c");
        assert_eq!(view.path_id, "a%20b%2Fc");
    }

    #[test]
    fn test_format_local() {
        let dt = DateTime::<Utc>::from_timestamp(1_714_557_600, 0).unwrap();
        let expected = dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string();

        assert_eq!(format_local(&dt), expected);
        assert_eq!(format_local(&dt).len(), 19);
    }
}
