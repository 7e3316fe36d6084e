use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{sse_records, RecordStream, ResponseMeta, ResponseObserver, SseRequest, Transport};
use crate::core::config::AppConfig;
use crate::core::error::TransportError;
use crate::core::event::RawEvent;

/// SSE over HTTP with `reqwest`. One request per stream, no reconnection:
/// a failed request or a non-2xx response becomes a single error record.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, TransportError> {
        match config.timeout_secs {
            Some(secs) => Self::with_timeout(Duration::from_secs(secs)),
            None => Ok(Self::new()),
        }
    }
}

impl Transport for HttpTransport {
    fn stream(
        &self,
        request: SseRequest,
        observer: Option<Arc<dyn ResponseObserver>>,
    ) -> RecordStream {
        let client = self.client.clone();

        let stream = async_stream::stream! {
            use tokio_stream::StreamExt;

            debug!(method = %request.method, url = %request.url, "sending request");
            let builder = match request.into_builder(&client) {
                Ok(b) => b,
                Err(e) => {
                    yield RawEvent::Error(e.to_string());
                    return;
                }
            };

            let response = match builder.send().await {
                Ok(r) => r,
                Err(e) => {
                    yield RawEvent::Error(TransportError::Http(e.to_string()).to_string());
                    return;
                }
            };

            if let Some(observer) = &observer {
                let meta = ResponseMeta::from_response(&response);
                if let Err(e) = observer.on_response(&meta).await {
                    warn!(error = %e, "response observer failed");
                }
            }

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                yield RawEvent::Error(
                    TransportError::Status {
                        status: status.as_u16(),
                        body,
                    }
                    .to_string(),
                );
                return;
            }

            let mut records = sse_records(response.bytes_stream());
            while let Some(record) = records.next().await {
                yield record;
            }
        };

        Box::pin(stream)
    }
}
