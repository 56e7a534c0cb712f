use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::DomainError;

/// A tracked anime or manga title
///
/// This is the only persisted entity. The whole collection is stored as one
/// JSON array, so the serde layout here IS the wire and storage format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    /// Opaque identifier, assigned by the client at creation and never changed
    pub id: String,

    pub title: String,

    #[serde(alias = "type")]
    pub category: MediaCategory,

    pub status: MediaStatus,

    /// Episodes watched or chapters read
    pub current_progress: u32,

    /// Total episodes or chapters (if known)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_progress: Option<u32>,

    /// 0 to 10 in steps of 0.5
    pub rating: f64,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "imageUrl")]
    pub cover_image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Where to watch or read it
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "link")]
    pub external_link: Option<String>,

    /// Milliseconds since the Unix epoch, stamped by the writer on every mutation
    #[serde(alias = "updatedAt")]
    pub last_modified_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaCategory {
    Anime,
    Manga,
}

/// Legacy labels from older backups are accepted on read only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaStatus {
    #[serde(alias = "Sedang Jalan")]
    Ongoing,
    #[serde(alias = "Selesai")]
    Completed,
    #[serde(alias = "Rencana")]
    Planned,
    #[serde(alias = "Dibatalkan")]
    Dropped,
}

impl MediaCategory {
    pub const ALL: [MediaCategory; 2] = [MediaCategory::Anime, MediaCategory::Manga];

    /// Unit of progress for display ("episode" or "chapter")
    pub fn progress_unit(&self) -> &'static str {
        match self {
            MediaCategory::Anime => "episode",
            MediaCategory::Manga => "chapter",
        }
    }
}

impl MediaStatus {
    pub const ALL: [MediaStatus; 4] = [
        MediaStatus::Ongoing,
        MediaStatus::Completed,
        MediaStatus::Planned,
        MediaStatus::Dropped,
    ];
}

impl MediaRecord {
    /// Total progress when it is actually known
    ///
    /// A stored total of 0 comes from forms that default the field, and is
    /// treated the same as an absent total.
    pub fn known_total(&self) -> Option<u32> {
        self.total_progress.filter(|total| *total > 0)
    }

    /// Whether the known total has been reached
    ///
    /// Display-only: completion is not persisted as a status.
    pub fn is_complete(&self) -> bool {
        self.known_total()
            .map_or(false, |total| self.current_progress >= total)
    }

    /// Progress as a rounded percentage capped at 100, if the total is known
    pub fn progress_percent(&self) -> Option<u8> {
        self.known_total().map(|total| {
            let percent = (self.current_progress as f64 / total as f64 * 100.0).round();
            percent.min(100.0) as u8
        })
    }
}

impl std::fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaCategory::Anime => write!(f, "Anime"),
            MediaCategory::Manga => write!(f, "Manga"),
        }
    }
}

impl std::fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaStatus::Ongoing => write!(f, "Ongoing"),
            MediaStatus::Completed => write!(f, "Completed"),
            MediaStatus::Planned => write!(f, "Planned"),
            MediaStatus::Dropped => write!(f, "Dropped"),
        }
    }
}

impl FromStr for MediaCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anime" => Ok(MediaCategory::Anime),
            "manga" => Ok(MediaCategory::Manga),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown category: {}",
                other
            ))),
        }
    }
}

impl FromStr for MediaStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ongoing" => Ok(MediaStatus::Ongoing),
            "completed" => Ok(MediaStatus::Completed),
            "planned" => Ok(MediaStatus::Planned),
            "dropped" => Ok(MediaStatus::Dropped),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown status: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(current: u32, total: Option<u32>) -> MediaRecord {
        MediaRecord {
            id: "1".to_string(),
            title: "Frieren".to_string(),
            category: MediaCategory::Anime,
            status: MediaStatus::Ongoing,
            current_progress: current,
            total_progress: total,
            rating: 9.5,
            cover_image_url: None,
            genres: None,
            description: None,
            external_link: None,
            last_modified_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_serializes_camel_case_and_omits_absent_fields() {
        let value = serde_json::to_value(record(3, Some(28))).unwrap();

        assert_eq!(value["currentProgress"], 3);
        assert_eq!(value["totalProgress"], 28);
        assert_eq!(value["category"], "Anime");
        assert_eq!(value["lastModifiedAt"], 1_700_000_000_000i64);
        assert!(value.get("coverImageUrl").is_none());
        assert!(value.get("genres").is_none());
    }

    #[test]
    fn test_reads_legacy_payload() {
        let legacy = json!({
            "_id": "65a1f0",
            "id": "abc",
            "title": "Berserk",
            "type": "Manga",
            "status": "Sedang Jalan",
            "currentProgress": 120,
            "rating": 10,
            "imageUrl": "https://img.example/berserk.jpg",
            "link": "https://read.example/berserk",
            "updatedAt": 1700000000000i64
        });

        let parsed: MediaRecord = serde_json::from_value(legacy).unwrap();
        assert_eq!(parsed.category, MediaCategory::Manga);
        assert_eq!(parsed.status, MediaStatus::Ongoing);
        assert_eq!(parsed.cover_image_url.as_deref(), Some("https://img.example/berserk.jpg"));
        assert_eq!(parsed.external_link.as_deref(), Some("https://read.example/berserk"));
        assert_eq!(parsed.total_progress, None);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let mut value = serde_json::to_value(record(0, None)).unwrap();
        value["status"] = json!("Paused");

        assert!(serde_json::from_value::<MediaRecord>(value).is_err());
    }

    #[test]
    fn test_negative_progress_is_rejected() {
        let mut value = serde_json::to_value(record(0, None)).unwrap();
        value["currentProgress"] = json!(-1);

        assert!(serde_json::from_value::<MediaRecord>(value).is_err());
    }

    #[test]
    fn test_completion_uses_known_total() {
        assert!(record(28, Some(28)).is_complete());
        assert!(record(30, Some(28)).is_complete());
        assert!(!record(27, Some(28)).is_complete());
        assert!(!record(5, None).is_complete());
        assert!(!record(5, Some(0)).is_complete());
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(record(1, Some(3)).progress_percent(), Some(33));
        assert_eq!(record(40, Some(28)).progress_percent(), Some(100));
        assert_eq!(record(4, None).progress_percent(), None);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("manga".parse::<MediaCategory>().unwrap(), MediaCategory::Manga);
        assert_eq!(" Dropped ".parse::<MediaStatus>().unwrap(), MediaStatus::Dropped);
        assert!("novel".parse::<MediaCategory>().is_err());
    }
}
