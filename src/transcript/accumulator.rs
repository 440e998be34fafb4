use super::block::{ContentBlock, ToolInvocation, ToolStatus, Transcript};
use crate::types::{
    MessageItem, ResultContent, StartedBlock, StreamDelta, StreamPayload, WireEvent, WireMessage,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Which block, if any, incremental content may still extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ActiveBlock {
    #[default]
    None,
    Text,
    Tools,
}

/// Where a registered invocation lives: block index, then entry index
/// within that block's tool list.
#[derive(Debug, Clone, Copy)]
struct ToolSlot {
    block: usize,
    entry: usize,
}

/// Folds decoded wire events into ordered content blocks, reconciling
/// incremental deltas against the finalized snapshots that follow them.
///
/// One accumulator serves one in-flight response. Events must arrive in
/// wire order; blocks are append-only and only the newest block ever
/// grows, while invocations anywhere stay updatable by id.
#[derive(Default)]
pub struct StreamAccumulator {
    blocks: Vec<ContentBlock>,
    active: ActiveBlock,
    tool_slots: HashMap<String, ToolSlot>,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one decoded event. A value that does not fit the wire model is
    /// ignored, the same policy the decoder applies to malformed frames.
    pub fn ingest(&mut self, event: &Value) {
        if let Ok(event) = WireEvent::deserialize(event) {
            self.apply(event);
        }
    }

    /// Run one typed event through the reconciliation rules.
    pub fn apply(&mut self, event: WireEvent) {
        match event {
            WireEvent::StreamEvent { event } => self.apply_stream_payload(event),
            WireEvent::Assistant { message } => self.apply_assistant_message(message),
            WireEvent::User { message } => self.apply_user_message(message),
            WireEvent::Unknown => {}
        }
    }

    /// Snapshot the accumulated state. Safe to call repeatedly, including
    /// after zero events.
    pub fn finalize(&self) -> Transcript {
        let full_response = self
            .blocks
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Tools { .. } => None,
            })
            .collect::<String>();

        Transcript {
            full_response,
            content_blocks: self.blocks.clone(),
        }
    }

    fn apply_stream_payload(&mut self, payload: StreamPayload) {
        match payload {
            StreamPayload::ContentBlockDelta {
                delta: StreamDelta::TextDelta { text },
            } => self.push_text_fragment(&text),
            StreamPayload::ContentBlockStart {
                block: StartedBlock::ToolUse { id, name, input },
            } => self.start_tool(id, name, input),
            _ => {}
        }
    }

    fn apply_assistant_message(&mut self, message: WireMessage) {
        for item in message.content {
            match item {
                MessageItem::Text { text } => self.close_text_with(text),
                MessageItem::ToolUse { id, name, input } => self.start_tool(id, name, input),
                // Tool results ride on user messages only.
                MessageItem::ToolResult { .. } | MessageItem::Unknown => {}
            }
        }
    }

    fn apply_user_message(&mut self, message: WireMessage) {
        for item in message.content {
            if let MessageItem::ToolResult {
                tool_use_id,
                is_error,
                content,
            } = item
            {
                self.record_result(&tool_use_id, is_error, &content);
            }
        }
    }

    fn push_text_fragment(&mut self, fragment: &str) {
        if self.active == ActiveBlock::Text {
            if let Some(ContentBlock::Text { text }) = self.blocks.last_mut() {
                text.push_str(fragment);
                return;
            }
        }

        self.blocks.push(ContentBlock::Text {
            text: fragment.to_string(),
        });
        self.active = ActiveBlock::Text;
    }

    fn close_text_with(&mut self, authoritative: String) {
        if self.active == ActiveBlock::Text {
            if let Some(ContentBlock::Text { text }) = self.blocks.last_mut() {
                *text = authoritative;
                self.active = ActiveBlock::None;
                return;
            }
        }

        self.blocks.push(ContentBlock::Text {
            text: authoritative,
        });
        self.active = ActiveBlock::None;
    }

    fn start_tool(&mut self, id: String, name: String, input: Value) {
        if let Some(slot) = self.tool_slots.get(&id).copied() {
            if let Some(tool) = self.tool_entry_mut(slot) {
                tool.name = name;
                tool.input = input;
            }
            return;
        }

        if self.active != ActiveBlock::Tools {
            self.blocks.push(ContentBlock::Tools { tools: Vec::new() });
            self.active = ActiveBlock::Tools;
        }

        let block = self.blocks.len() - 1;
        if let Some(ContentBlock::Tools { tools }) = self.blocks.last_mut() {
            let entry = tools.len();
            tools.push(ToolInvocation {
                id: id.clone(),
                name,
                input,
                status: ToolStatus::Pending,
                output: None,
            });
            self.tool_slots.insert(id, ToolSlot { block, entry });
        }
    }

    fn record_result(&mut self, tool_use_id: &str, is_error: bool, content: &ResultContent) {
        let Some(slot) = self.tool_slots.get(tool_use_id).copied() else {
            return;
        };

        if let Some(tool) = self.tool_entry_mut(slot) {
            tool.output = Some(content.joined_text());
            tool.status = if is_error {
                ToolStatus::Error
            } else {
                ToolStatus::Success
            };
        }
    }

    fn tool_entry_mut(&mut self, slot: ToolSlot) -> Option<&mut ToolInvocation> {
        match self.blocks.get_mut(slot.block) {
            Some(ContentBlock::Tools { tools }) => tools.get_mut(slot.entry),
            _ => None,
        }
    }
}
