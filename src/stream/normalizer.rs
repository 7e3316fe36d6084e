use serde_json::Value;
use tracing::{debug, warn};

use super::accumulator::StreamState;
use super::classifier;
use crate::core::event::{NormalizedEvent, RawEvent};
use crate::providers;

/// Payload OpenAI-compatible APIs send as their last event.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Outcome of feeding one record to a [`Normalizer`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Emit(NormalizedEvent),
    /// Nothing new (framing, pings, unrecognized messages).
    Skip,
    /// The sentinel was seen; no more records should be fed.
    End,
}

/// Per-record state machine behind [`super::normalize`]. One instance per
/// stream; it never suspends and performs no I/O.
#[derive(Debug, Default)]
pub struct Normalizer {
    state: StreamState,
    ended: bool,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    pub fn process(&mut self, record: RawEvent) -> Step {
        if self.ended {
            return Step::End;
        }

        let data = match record {
            RawEvent::Error(error) => {
                warn!(%error, "transport error");
                return Step::Emit(NormalizedEvent::error(error));
            }
            RawEvent::Data(data) => data,
        };

        if data == DONE_SENTINEL {
            debug!("stream finished with sentinel");
            self.ended = true;
            return Step::End;
        }

        let message: Value = match serde_json::from_str(&data) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "undecodable event payload");
                return Step::Emit(NormalizedEvent::decode_error(e.to_string(), data));
            }
        };

        if let Some(error) = classifier::classify(&message) {
            warn!(%error, "provider reported an error");
            return Step::Emit(NormalizedEvent::error(error));
        }

        let Some((provider, delta)) = providers::extract(&message) else {
            debug!("skipping message with no recognizable delta");
            return Step::Skip;
        };

        if self.state.apply(delta) {
            debug!(provider, "delta applied");
            Step::Emit(self.state.snapshot(message))
        } else {
            Step::Skip
        }
    }
}

/// Blocking counterpart of [`super::normalize`] for record sources that are
/// plain iterators.
pub struct NormalizedIter<I> {
    records: I,
    normalizer: Normalizer,
}

impl<I> NormalizedIter<I>
where
    I: Iterator<Item = RawEvent>,
{
    pub fn new(records: I) -> Self {
        Self {
            records,
            normalizer: Normalizer::new(),
        }
    }
}

impl<I> Iterator for NormalizedIter<I>
where
    I: Iterator<Item = RawEvent>,
{
    type Item = NormalizedEvent;

    fn next(&mut self) -> Option<NormalizedEvent> {
        if self.normalizer.is_ended() {
            return None;
        }
        for record in self.records.by_ref() {
            match self.normalizer.process(record) {
                Step::Emit(event) => return Some(event),
                Step::Skip => continue,
                Step::End => return None,
            }
        }
        None
    }
}
