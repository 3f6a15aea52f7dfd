//! Media library items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rmt_core::{MediaId, MediaKind};

/// A registered image or video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: MediaId,
    pub url: String,
    pub resource_type: MediaKind,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub application_name: String,
}

impl MediaItem {
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.resource_type == MediaKind::Video
    }
}

/// Registration payload. Accepts both `resourceType` and `resource_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedia {
    pub url: String,
    #[serde(default, alias = "resource_type")]
    pub resource_type: MediaKind,
    #[serde(default)]
    pub filename: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_media_accepts_both_spellings() {
        let camel: NewMedia =
            serde_json::from_str(r#"{"url":"/uploads/a.mp4","resourceType":"video"}"#).unwrap();
        let snake: NewMedia =
            serde_json::from_str(r#"{"url":"/uploads/a.mp4","resource_type":"video"}"#).unwrap();
        assert_eq!(camel.resource_type, MediaKind::Video);
        assert_eq!(snake.resource_type, MediaKind::Video);
        assert_eq!(camel.filename, "");
    }

    #[test]
    fn test_new_media_defaults_to_image() {
        let media: NewMedia = serde_json::from_str(r#"{"url":"/uploads/a.png"}"#).unwrap();
        assert_eq!(media.resource_type, MediaKind::Image);
    }
}
