//! Domain models shared between the worker and the API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One attachment of a posted message, as reported by the platform.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachmentRef {
    /// Platform file identifier.
    pub file_id: String,
    /// Original file name, extension included.
    pub file_name: String,
    /// Path of the stored attachment, relative to the platform data root.
    pub storage_path: String,
}

/// A "message posted with attachments" event. One conversion job covers
/// every attachment of the post; the post id namespaces conversion
/// artifacts on disk.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostedAttachments {
    pub post_id: String,
    pub attachments: Vec<AttachmentRef>,
}

/// File record as returned by the platform's file-info API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub post_id: String,
    /// Storage path relative to the platform data root.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posted_attachments_round_trips_json() {
        let event = PostedAttachments {
            post_id: "p1".to_string(),
            attachments: vec![AttachmentRef {
                file_id: "f1".to_string(),
                file_name: "report.docx".to_string(),
                storage_path: "20260806/teams/t1/f1/report.docx".to_string(),
            }],
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PostedAttachments = serde_json::from_str(&json).unwrap();
        assert_eq!(back.post_id, "p1");
        assert_eq!(back.attachments.len(), 1);
        assert_eq!(back.attachments[0].file_name, "report.docx");
    }
}
