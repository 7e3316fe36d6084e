pub mod cli;
pub mod core;
pub mod providers;
pub mod stream;
pub mod translate;
pub mod transport;

pub use crate::core::event::{NormalizedEvent, RawEvent, ToolCall};
pub use crate::stream::{async_llm, normalize, NormalizedEventStream};
pub use crate::transport::{HttpTransport, ResponseMeta, ResponseObserver, SseRequest, Transport};
