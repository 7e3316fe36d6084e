use serde_json::Value;

use crate::core::event::{NormalizedEvent, ToolCall};
use crate::providers::Delta;

/// Running state of one stream: the text so far and every tool call seen so
/// far, in first-seen order. Tool calls are only ever appended, and their
/// `args` only ever grow.
#[derive(Debug, Default)]
pub struct StreamState {
    content: Option<String>,
    tools: Vec<ToolCall>,
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one delta into the state. Returns `true` when the delta carried
    /// anything, including an empty content string or an empty args chunk.
    pub fn apply(&mut self, delta: Delta) -> bool {
        let changed = delta.has_data();

        if let Some(text) = delta.content {
            self.content.get_or_insert_with(String::new).push_str(&text);
        }

        for tool in delta.tools {
            if let Some(name) = tool.name.filter(|n| !n.is_empty()) {
                self.tools.push(ToolCall::new(name, tool.id));
            }
            if let Some(args) = tool.args.filter(|a| !a.is_empty()) {
                self.latest_tool().args.push_str(&args);
            }
        }

        changed
    }

    /// Argument chunks carry no name or id, so they always extend the most
    /// recently opened call.
    // TODO: route by tool id/index if a provider ever interleaves argument
    // chunks of two open calls.
    fn latest_tool(&mut self) -> &mut ToolCall {
        if self.tools.is_empty() {
            self.tools.push(ToolCall::default());
        }
        let last = self.tools.len() - 1;
        &mut self.tools[last]
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn tools(&self) -> &[ToolCall] {
        &self.tools
    }

    /// Full snapshot of the state, tagged with the message that changed it.
    pub fn snapshot(&self, message: Value) -> NormalizedEvent {
        NormalizedEvent {
            content: self.content.clone(),
            tools: (!self.tools.is_empty()).then(|| self.tools.clone()),
            message: Some(message),
            ..Default::default()
        }
    }
}
