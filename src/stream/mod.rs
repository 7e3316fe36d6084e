//! The normalization loop: raw SSE records in, [`NormalizedEvent`]s out.
//!
//! Per record: transport errors pass straight through, the payload is decoded
//! as JSON, provider errors are classified, and otherwise the first matching
//! extractor's delta is folded into the running state. An event is emitted
//! only when the state changed, and it always carries the whole answer so far.
//! Nothing here is fatal; the stream ends when the transport does or when the
//! `[DONE]` sentinel arrives.

pub mod accumulator;
pub mod classifier;
pub mod normalizer;

pub use accumulator::StreamState;
pub use normalizer::{NormalizedIter, Normalizer, Step, DONE_SENTINEL};

use std::pin::Pin;
use std::sync::Arc;

use crate::core::event::{NormalizedEvent, RawEvent};
use crate::transport::{ResponseObserver, SseRequest, Transport};


pub type NormalizedEventStream =
    Pin<Box<dyn futures_core::Stream<Item = NormalizedEvent> + Send>>;

/// Normalize a stream of transport records. Lazy: no record is pulled until
/// the returned stream is polled, and dropping it drops `records`.
pub fn normalize<S>(records: S) -> NormalizedEventStream
where
    S: futures_core::Stream<Item = RawEvent> + Send + 'static,
{
    let stream = async_stream::stream! {
        use tokio_stream::StreamExt;

        let mut records = Box::pin(records);
        let mut normalizer = Normalizer::new();

        while let Some(record) = records.next().await {
            match normalizer.process(record) {
                Step::Emit(event) => yield event,
                Step::Skip => continue,
                Step::End => break,
            }
        }
    };

    Box::pin(stream)
}

/// Normalize a plain iterator of records.
pub fn normalize_iter<I>(records: I) -> NormalizedIter<I::IntoIter>
where
    I: IntoIterator<Item = RawEvent>,
{
    NormalizedIter::new(records.into_iter())
}

/// Stream `request` through `transport` and normalize whatever comes back.
///
/// ```no_run
/// # async fn demo() {
/// use asyncllm::{async_llm, HttpTransport, SseRequest};
/// use tokio_stream::StreamExt;
///
/// let request = SseRequest::post(
///     "https://api.openai.com/v1/chat/completions",
///     serde_json::json!({
///         "model": "gpt-4.1-nano",
///         "stream": true,
///         "messages": [{"role": "user", "content": "Hello, world!"}],
///     }),
/// )
/// .header("Authorization", "Bearer YOUR_API_KEY");
///
/// let mut events = async_llm(&HttpTransport::new(), request, None);
/// while let Some(event) = events.next().await {
///     println!("{event:?}");
/// }
/// # }
/// ```
pub fn async_llm<T>(
    transport: &T,
    request: SseRequest,
    observer: Option<Arc<dyn ResponseObserver>>,
) -> NormalizedEventStream
where
    T: Transport + ?Sized,
{
    normalize(transport.stream(request, observer))
}
