//! Streaming relay of provider asset bytes.
//!
//! Every relayed body converges on [`RelayBody`], one adapter over the
//! two source shapes we meet: an HTTP response exposing a push-style
//! chunk stream, and any pull-style [`AsyncRead`] reader. Either way the
//! result is a lazy, finite, non-restartable sequence of byte chunks
//! forwarded as they arrive, so arbitrarily large assets relay under
//! constant memory.

use axum::body::Body;
use axum::http::{header, HeaderName, Response};
use axum::response::IntoResponse;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// Fallback Content-Type when the provider omits one.
const DEFAULT_CONTENT_TYPE: &str = "video/mp4";

/// Response headers forwarded from the provider verbatim.
const FORWARDED_HEADERS: [HeaderName; 4] = [
    header::CONTENT_TYPE,
    header::CONTENT_LENGTH,
    header::ACCEPT_RANGES,
    header::CONTENT_RANGE,
];

/// A finite, non-restartable stream of asset bytes.
pub struct RelayBody(Body);

impl RelayBody {
    /// Adapt a push-style source: the chunk stream of an HTTP response.
    pub fn from_response(response: reqwest::Response) -> Self {
        Self(Body::from_stream(response.bytes_stream()))
    }

    /// Adapt a pull-style source: anything readable, drained chunk by
    /// chunk via [`ReaderStream`].
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        Self(Body::from_stream(ReaderStream::new(reader)))
    }

    pub fn into_body(self) -> Body {
        self.0
    }
}

/// Build the relayed response for a successful provider content fetch.
///
/// Propagates the provider's status (200 or 206) and range/length
/// headers, defaults the content type to a generic video type, and
/// streams the body through without buffering.
pub fn relay_success(upstream: reqwest::Response) -> Response<Body> {
    let mut builder = Response::builder().status(upstream.status());

    for name in FORWARDED_HEADERS {
        if let Some(value) = upstream.headers().get(&name) {
            builder = builder.header(name, value.clone());
        }
    }
    if !upstream.headers().contains_key(header::CONTENT_TYPE) {
        builder = builder.header(header::CONTENT_TYPE, DEFAULT_CONTENT_TYPE);
    }

    builder
        .body(RelayBody::from_response(upstream).into_body())
        .unwrap()
}

/// Relay a provider error response.
///
/// The provider's status code passes through untranslated; the body text
/// is wrapped as `{ "message": ... }` so error payloads share one shape
/// with the rest of the API.
pub async fn relay_error(upstream: reqwest::Response) -> Response<Body> {
    let status = upstream.status();
    let body = upstream
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());

    tracing::warn!(upstream_status = %status, "Relaying provider content error");

    (status, axum::Json(serde_json::json!({ "message": body }))).into_response()
}
