use chrono::{DateTime, NaiveDateTime, Utc};
use core::fmt;
use serde::{Deserialize, Deserializer, Serialize, de};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Backend assigned entry identifier.
///
/// Some backends use integer keys, others strings; both are kept as sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntryId::Number(n) => write!(f, "{}", n),
            EntryId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for EntryId {
    fn from(val: i64) -> Self {
        Self::Number(val)
    }
}

impl From<&str> for EntryId {
    fn from(val: &str) -> Self {
        Self::Text(val.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDto {
    pub id: EntryId,
    pub name: String,
    pub message: String,

    #[serde(deserialize_with = "deserialize_created_at")]
    pub created_at: DateTime<Utc>,
}

/// Parses a backend timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.and_utc())
}

fn deserialize_created_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid created_at timestamp: {}", raw)))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntryDto {
    pub name: String,
    pub message: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEntryDto {
    pub message: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEntryDto {
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_id() {
        let entry: EntryDto = serde_json::from_value(json!({
            "id": 1,
            "name": "A",
            "message": "hi",
            "created_at": "2024-05-01T10:00:00Z",
        }))
        .unwrap();

        assert_eq!(entry.id, EntryId::Number(1));
        assert_eq!(entry.id.to_string(), "1");
    }

    #[test]
    fn test_text_id() {
        let entry: EntryDto = serde_json::from_value(json!({
            "id": "0196d1db-bfd8-7819-b918-3f14ac3ed485",
            "name": "A",
            "message": "hi",
            "created_at": "2024-05-01T10:00:00.123+09:00",
        }))
        .unwrap();

        assert_eq!(
            entry.id,
            EntryId::from("0196d1db-bfd8-7819-b918-3f14ac3ed485")
        );
    }

    #[test]
    fn test_id_is_echoed_as_sent() {
        let value = serde_json::to_value(EntryId::from(42)).unwrap();
        assert_eq!(value, json!(42));

        let value = serde_json::to_value(EntryId::from("42")).unwrap();
        assert_eq!(value, json!("42"));
    }

    #[test]
    fn test_offset_less_timestamp_is_utc() {
        let entries: Vec<EntryDto> = serde_json::from_value(json!([
            {
                "id": 2,
                "name": "B",
                "message": "later",
                "created_at": "2024-05-01T10:00:00",
            },
            {
                "id": 1,
                "name": "A",
                "message": "earlier",
                "created_at": "2024-05-01 09:30:00.250",
            },
        ]))
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].created_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert_eq!(entries[1].created_at.timestamp(), 1_714_555_800);
        assert_eq!(entries[1].created_at.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_offset_timestamp_is_converted() {
        let parsed = parse_timestamp("2024-05-01T19:00:00+09:00").unwrap();
        assert_eq!(parsed, parse_timestamp("2024-05-01T10:00:00").unwrap());
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        let result: Result<EntryDto, _> = serde_json::from_value(json!({
            "id": 1,
            "name": "A",
            "message": "hi",
            "created_at": "yesterday",
        }));

        assert!(result.is_err());
        assert!(parse_timestamp("2024-05-01").is_none());
    }

    #[test]
    fn test_password_never_on_entry() {
        let entry: EntryDto = serde_json::from_value(json!({
            "id": 7,
            "name": "A",
            "message": "hi",
            "password": "secret",
            "created_at": "2024-05-01T10:00:00Z",
        }))
        .unwrap();

        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("password").is_none());
    }
}
