//! Helpers shared by the handler and page tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use domain_events::{EventError, MediaUploader, Result, UploadedMedia};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const BOUNDARY: &str = "evently-test-boundary";

/// Uploader that never leaves the process and counts its calls
#[derive(Clone, Default)]
pub struct StubUploader {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl StubUploader {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaUploader for StubUploader {
    async fn upload(&self, bytes: Vec<u8>) -> Result<UploadedMedia> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(EventError::Upload("media host unavailable".into()));
        }
        Ok(UploadedMedia {
            url: format!("https://res.test/events/{}-{}.png", n, bytes.len()),
        })
    }
}

/// Valid form fields for an event titled `title` with the given tags
pub fn event_fields(title: &str, tags: &str) -> Vec<(String, String)> {
    [
        ("title", title),
        ("description", "A day of talks"),
        ("overview", "Talks and workshops"),
        ("venue", "Hall A"),
        ("location", "Berlin, Germany"),
        ("date", "2025-10-01"),
        ("time", "10:00"),
        ("mode", "hybrid"),
        ("audience", "Developers"),
        ("organizer", "Evently"),
        ("tags", tags),
        ("agenda", r#"["Keynote","Q&A"]"#),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Hand-built `multipart/form-data` body
pub fn multipart_body(fields: &[(String, String)], file: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some(bytes) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"banner.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn create_request(fields: &[(String, String)], file: Option<&[u8]>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/events")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(fields, file)))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn json_body(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
