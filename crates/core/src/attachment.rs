//! Binary attachments stored inline with their owning record.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Marker rendered in place of the bytes when an attachment has a filename.
pub const EXISTS_MARKER: &str = "exists";

/// An uploaded file kept alongside a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub data: Vec<u8>,
    pub filename: Option<String>,
    pub mime: Option<String>,
    pub size: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Attachment {
    /// Creates an attachment from an upload.
    pub fn new(
        data: Vec<u8>,
        filename: Option<String>,
        mime: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let size = i64::try_from(data.len()).ok();
        Self {
            data,
            filename,
            mime,
            size,
            updated_at: Some(now),
        }
    }

    /// Content type to serve the attachment with.
    pub fn content_type(&self) -> &str {
        self.mime
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or("application/octet-stream")
    }

    /// Filename to serve the attachment with.
    pub fn download_name(&self) -> &str {
        self.filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or("attachment")
    }
}

/// Renders attachment content for listings.
///
/// Named uploads are reported as [`EXISTS_MARKER`] (clients fetch the bytes
/// from a dedicated endpoint); anonymous blobs are inlined as base64.
pub fn render_content(attachment: &Attachment) -> String {
    match attachment.filename.as_deref() {
        Some(name) if !name.is_empty() => EXISTS_MARKER.to_string(),
        _ => STANDARD.encode(&attachment.data),
    }
}

/// Builds a `Content-Disposition` header value.
pub fn content_disposition(filename: &str, inline: bool) -> String {
    let kind = if inline { "inline" } else { "attachment" };
    let escaped = filename.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{kind}; filename=\"{escaped}\"")
}

#[derive(Serialize)]
struct AttachmentSummary<'a> {
    content: String,
    filename: Option<&'a str>,
    mime: Option<&'a str>,
    size: Option<i64>,
    updated_at: Option<DateTime<Utc>>,
}

impl Serialize for Attachment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AttachmentSummary {
            content: render_content(self),
            filename: self.filename.as_deref(),
            mime: self.mime.as_deref(),
            size: self.size,
            updated_at: self.updated_at,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(filename: Option<&str>) -> Attachment {
        Attachment::new(
            b"hello".to_vec(),
            filename.map(str::to_string),
            Some("text/plain".to_string()),
            Utc::now(),
        )
    }

    #[test]
    fn named_attachment_renders_marker() {
        assert_eq!(render_content(&blob(Some("a.txt"))), "exists");
    }

    #[test]
    fn anonymous_attachment_renders_base64() {
        assert_eq!(render_content(&blob(None)), "aGVsbG8=");
        assert_eq!(render_content(&blob(Some(""))), "aGVsbG8=");
    }

    #[test]
    fn size_is_taken_from_data() {
        assert_eq!(blob(None).size, Some(5));
    }

    #[test]
    fn serializes_as_summary() {
        let json = serde_json::to_value(blob(Some("a.txt"))).unwrap();
        assert_eq!(json["content"], "exists");
        assert_eq!(json["filename"], "a.txt");
        assert_eq!(json["mime"], "text/plain");
        assert_eq!(json["size"], 5);
    }

    #[test]
    fn content_disposition_variants() {
        assert_eq!(
            content_disposition("report.pdf", true),
            "inline; filename=\"report.pdf\""
        );
        assert_eq!(
            content_disposition("a\"b.pdf", false),
            "attachment; filename=\"a\\\"b.pdf\""
        );
    }

    #[test]
    fn defaults_for_missing_metadata() {
        let attachment = Attachment {
            data: vec![],
            filename: None,
            mime: None,
            size: None,
            updated_at: None,
        };
        assert_eq!(attachment.content_type(), "application/octet-stream");
        assert_eq!(attachment.download_name(), "attachment");
    }
}
