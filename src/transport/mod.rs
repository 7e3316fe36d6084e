//! The SSE transport the normalizer reads from.
//!
//! A transport turns one request into a lazy, finite sequence of
//! [`RawEvent`] records, one per wire event. It owns connection handling and
//! timeouts; the normalizer owns everything after the record boundary.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use crate::core::error::TransportError;
use crate::core::event::RawEvent;

pub type RecordStream = Pin<Box<dyn futures_core::Stream<Item = RawEvent> + Send>>;

pub trait Transport: Send + Sync {
    /// Start streaming `request`. Nothing is sent until the returned stream
    /// is first polled; dropping the stream cancels the request.
    fn stream(
        &self,
        request: SseRequest,
        observer: Option<Arc<dyn ResponseObserver>>,
    ) -> RecordStream;
}

#[derive(Debug, Clone)]
pub struct SseRequest {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl SseRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            headers: vec![],
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            method: Method::POST,
            headers: vec![],
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    fn into_builder(
        self,
        client: &reqwest::Client,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = reqwest::Url::parse(&self.url)
            .map_err(|e| TransportError::InvalidRequest(format!("{}: {e}", self.url)))?;

        let mut builder = client.request(self.method, url);
        for (name, value) in &self.headers {
            let name = reqwest::header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::InvalidRequest(format!("header {name}: {e}")))?;
            let value = reqwest::header::HeaderValue::from_str(value)
                .map_err(|e| TransportError::InvalidRequest(format!("header {name}: {e}")))?;
            builder = builder.header(name, value);
        }
        if let Some(body) = &self.body {
            builder = builder.json(body);
        }
        Ok(builder)
    }
}

/// Status line and headers of the response, handed to the observer before
/// the first record is produced.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: u16,
    pub headers: HeaderMap,
}

impl ResponseMeta {
    pub fn from_response(response: &reqwest::Response) -> Self {
        Self {
            status: response.status().as_u16(),
            headers: response.headers().clone(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Called once per request when the response head arrives. An error is
/// logged and otherwise ignored; it never stops the stream.
#[async_trait]
pub trait ResponseObserver: Send + Sync {
    async fn on_response(&self, response: &ResponseMeta) -> anyhow::Result<()>;
}

#[async_trait]
impl<F> ResponseObserver for F
where
    F: Fn(&ResponseMeta) -> anyhow::Result<()> + Send + Sync,
{
    async fn on_response(&self, response: &ResponseMeta) -> anyhow::Result<()> {
        self(response)
    }
}

/// Split a byte stream on SSE event boundaries and yield each event's data.
/// A read or framing error yields one [`RawEvent::Error`] and ends the
/// sequence.
pub fn sse_records<S, B, E>(bytes: S) -> RecordStream
where
    S: futures_core::Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let stream = async_stream::stream! {
        use tokio_stream::StreamExt;

        let mut events = Box::pin(bytes.eventsource());
        while let Some(event) = events.next().await {
            match event {
                Ok(event) => yield RawEvent::Data(event.data),
                Err(e) => {
                    yield RawEvent::Error(TransportError::Stream(e.to_string()).to_string());
                    break;
                }
            }
        }
    };

    Box::pin(stream)
}
