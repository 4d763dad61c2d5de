use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Creates a CORS layer for the given origins.
///
/// Origins are trimmed and empty entries skipped. Fails when no valid origin
/// remains or an origin is not a valid header value.
///
/// The layer allows:
/// - GET, POST, OPTIONS (the API only reads and creates)
/// - Content-Type and Accept headers
/// - 1 hour max age
pub fn create_cors_layer<S: AsRef<str>>(allowed_origins: &[S]) -> io::Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS origin: {}", e),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "At least one CORS origin is required",
        ));
    }

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_cors_layer_accepts_origins() {
        let layer = create_cors_layer(&["http://localhost:8080", " https://evently.dev "]);
        assert!(layer.is_ok());
    }

    #[test]
    fn test_create_cors_layer_rejects_empty() {
        let err = create_cors_layer(&["", "  "]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_create_cors_layer_rejects_invalid_header_value() {
        let err = create_cors_layer(&["http://bad\norigin"]).unwrap_err();
        assert!(err.to_string().contains("Invalid CORS origin"));
    }
}
