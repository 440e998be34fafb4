use serde::Deserialize;
use serde_json::Value;

/// Top-level event on the wire, discriminated by `kind`.
///
/// Anything the crate does not recognize folds into `Unknown`, at this
/// level and every nested one, so new event kinds pass through a deployed
/// decoder without breaking it.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WireEvent {
    StreamEvent {
        event: StreamPayload,
    },
    Assistant {
        message: WireMessage,
    },
    User {
        message: WireMessage,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamPayload {
    ContentBlockDelta {
        delta: StreamDelta,
    },
    ContentBlockStart {
        block: StartedBlock,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamDelta {
    TextDelta {
        text: String,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StartedBlock {
    ToolUse {
        id: String,
        name: String,
        #[serde(default = "default_json_object")]
        input: Value,
    },
    #[serde(other)]
    Unknown,
}

/// Finalized message snapshot carried by `assistant` and `user` events.
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    #[serde(default)]
    pub content: Vec<MessageItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageItem {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default = "default_json_object")]
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        #[serde(default)]
        is_error: bool,
        #[serde(default)]
        content: ResultContent,
    },
    #[serde(other)]
    Unknown,
}

/// Tool-result payload: either a bare string or a list of fragments.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResultContent {
    Text(String),
    Fragments(Vec<ResultFragment>),
}

impl Default for ResultContent {
    fn default() -> Self {
        ResultContent::Fragments(Vec::new())
    }
}

impl ResultContent {
    /// Text fragments joined with a newline; non-text fragments are skipped.
    pub fn joined_text(&self) -> String {
        match self {
            ResultContent::Text(text) => text.clone(),
            ResultContent::Fragments(fragments) => fragments
                .iter()
                .filter_map(|fragment| match fragment {
                    ResultFragment::Text { text } => Some(text.as_str()),
                    ResultFragment::Unknown => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultFragment {
    Text {
        text: String,
    },
    #[serde(other)]
    Unknown,
}

fn default_json_object() -> Value {
    Value::Object(serde_json::Map::new())
}
