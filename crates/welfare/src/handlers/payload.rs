//! Request bodies that arrive as JSON or as multipart forms.
//!
//! Multipart text fields are collected into a JSON object of strings so the
//! same input types deserialize both shapes. File fields are kept aside and
//! taken by name.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{multipart::Multipart, FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use welfare_core::attachment::Attachment;

use super::AppError;

/// An uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub data: Vec<u8>,
    pub filename: Option<String>,
    pub mime: Option<String>,
}

impl Upload {
    pub fn into_attachment(self, now: DateTime<Utc>) -> Attachment {
        Attachment::new(self.data, self.filename, self.mime, now)
    }
}

/// A deserialized body plus the files sent with it.
pub struct Payload<T> {
    pub body: T,
    pub files: HashMap<String, Upload>,
}

impl<T> Payload<T> {
    /// Takes the file sent under `field` as an attachment.
    pub fn attachment(&mut self, field: &str, now: DateTime<Utc>) -> Option<Attachment> {
        self.files
            .remove(field)
            .map(|upload| upload.into_attachment(now))
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

/// Adds a text field. Repeated names (and `name[]`) collect into an array.
fn push_field(fields: &mut Map<String, Value>, name: &str, value: String) {
    let key = name.strip_suffix("[]").unwrap_or(name).to_string();
    match fields.get_mut(&key) {
        Some(Value::Array(items)) => items.push(Value::String(value)),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, Value::String(value)]);
        }
        None => {
            let value = if name.ends_with("[]") {
                Value::Array(vec![Value::String(value)])
            } else {
                Value::String(value)
            };
            fields.insert(key, value);
        }
    }
}

async fn read_multipart(
    multipart: &mut Multipart,
) -> Result<(Map<String, Value>, HashMap<String, Upload>), AppError> {
    let mut fields = Map::new();
    let mut files = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(filename) = field.file_name().map(str::to_string) {
            let mime = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::bad_request(e.body_text()))?;
            // Browsers send an empty part for an untouched file input.
            if data.is_empty() && filename.is_empty() {
                continue;
            }
            files.insert(
                name,
                Upload {
                    data: data.to_vec(),
                    filename: Some(filename).filter(|f| !f.is_empty()),
                    mime,
                },
            );
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::bad_request(e.body_text()))?;
            push_field(&mut fields, &name, text);
        }
    }

    Ok((fields, files))
}

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (fields, files) = if is_multipart(&req) {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::bad_request(e.body_text()))?;
            read_multipart(&mut multipart).await?
        } else {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::bad_request(e.body_text()))?;
            let fields = if bytes.iter().all(u8::is_ascii_whitespace) {
                Map::new()
            } else {
                serde_json::from_slice(&bytes)
                    .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {e}")))?
            };
            (fields, HashMap::new())
        };

        let body = serde_json::from_value(Value::Object(fields))
            .map_err(|e| AppError::bad_request(format!("Invalid request body: {e}")))?;

        Ok(Self { body, files })
    }
}
