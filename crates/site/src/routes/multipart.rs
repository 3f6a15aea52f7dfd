//! Buffering multipart bodies into text fields and files.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;

use rmt_core::MediaKind;

use crate::error::AppError;

/// A file part from a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-side file name (only the extension is used).
    pub file_name: String,
    /// Declared MIME type, if any.
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Media kind implied by the declared MIME type.
    #[must_use]
    pub fn kind(&self) -> MediaKind {
        self.content_type
            .as_deref()
            .map(MediaKind::from_mime)
            .unwrap_or_default()
    }
}

/// A fully read multipart body.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<(String, UploadedFile)>,
}

impl MultipartForm {
    /// Read every part of `multipart`.
    ///
    /// File inputs left empty by the browser (no name and no bytes) are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the body is malformed or exceeds the
    /// body limit.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(ToOwned::to_owned) else {
                continue;
            };

            match field.file_name().map(ToOwned::to_owned) {
                Some(file_name) => {
                    let content_type = field.content_type().map(ToOwned::to_owned);
                    let bytes = field.bytes().await?;
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.push((
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            bytes,
                        },
                    ));
                }
                None => {
                    let text = field.text().await?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Text value of a field, or `""` when absent.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", String::as_str)
    }

    /// Whether a checkbox-style field was submitted.
    #[must_use]
    pub fn checked(&self, name: &str) -> bool {
        matches!(self.text(name), "on" | "true" | "1")
    }

    /// First file submitted under `name`.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files
            .iter()
            .find_map(|(field, file)| (field == name).then_some(file))
    }

    /// Take every file submitted under `name`, in submission order.
    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        let (matching, rest) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|(field, _)| field == name);
        self.files = rest;
        matching.into_iter().map(|(_, file)| file).collect()
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::BadRequest(err.body_text())
        }
    }
}
