//! Multipart form decoding for event creation

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use std::collections::HashMap;
use std::str::FromStr;

use crate::codec::decode_string_list;
use crate::error::{EventError, Result};
use crate::models::{CreateEvent, EventMode};

/// Form field carrying the banner image
pub const IMAGE_FIELD: &str = "file";

pub const IMAGE_REQUIRED: &str = "Image File is required";
pub const INVALID_FORM: &str = "Invalid form data";

/// Raw multipart payload: text fields by name plus the image bytes
#[derive(Debug, Default)]
pub struct EventFormData {
    pub fields: HashMap<String, String>,
    pub image: Option<Vec<u8>>,
}

impl EventFormData {
    /// Drain a multipart body. Unknown fields are kept and ignored later.
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(form_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == IMAGE_FIELD {
                let bytes = field.bytes().await.map_err(form_error)?;
                if !bytes.is_empty() {
                    form.image = Some(bytes.to_vec());
                }
            } else {
                let value = field.text().await.map_err(form_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Split into the typed input and the image bytes.
    ///
    /// Checks run in this order: image present, `tags`/`agenda` decodable,
    /// `mode` known. Field-level validation is left to the service.
    pub fn into_parts(mut self) -> Result<(CreateEvent, Vec<u8>)> {
        let image = self
            .image
            .take()
            .ok_or_else(|| EventError::BadRequest(IMAGE_REQUIRED.to_string()))?;

        let tags = decode_string_list("tags", &self.take("tags"))?;
        let agenda = decode_string_list("agenda", &self.take("agenda"))?;

        let raw_mode = self.take("mode");
        let mode = EventMode::from_str(raw_mode.trim()).map_err(|_| {
            EventError::BadRequest("mode must be one of online, offline, hybrid".to_string())
        })?;

        let input = CreateEvent {
            title: self.take("title"),
            description: self.take("description"),
            overview: self.take("overview"),
            venue: self.take("venue"),
            location: self.take("location"),
            date: self.take("date"),
            time: self.take("time"),
            mode,
            audience: self.take("audience"),
            organizer: self.take("organizer"),
            agenda,
            tags,
        };

        Ok((input, image))
    }

    fn take(&mut self, name: &str) -> String {
        self.fields.remove(name).unwrap_or_default()
    }
}

fn form_error(err: MultipartError) -> EventError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        EventError::PayloadTooLarge("Request body is too large".to_string())
    } else {
        tracing::debug!(error = %err, "Unreadable multipart body");
        EventError::InvalidForm(INVALID_FORM.to_string())
    }
}
