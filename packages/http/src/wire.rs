//! Notion block JSON encoding.
//!
//! Outgoing blocks carry a single `rich_text` list; incoming blocks are
//! flattened to their plain text.

use serde::Deserialize;
use serde_json::{json, Map, Value as JsonValue};

use sectionsync_core::{Block, BlockKind, RemoteError};

/// Longest `text.content` the API accepts in one rich-text run.
pub const MAX_TEXT_RUN: usize = 2000;

/// Encode a block for an append request.
pub fn encode_block(block: &Block) -> JsonValue {
    let type_name = block.kind.type_name();

    let mut payload = Map::new();
    payload.insert("rich_text".to_string(), JsonValue::Array(rich_text(&block.text)));

    let mut object = Map::new();
    object.insert("object".to_string(), json!("block"));
    object.insert("type".to_string(), json!(type_name));
    object.insert(type_name.to_string(), JsonValue::Object(payload));
    JsonValue::Object(object)
}

/// Split text into runs of at most `MAX_TEXT_RUN` characters.
fn rich_text(text: &str) -> Vec<JsonValue> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(MAX_TEXT_RUN)
        .map(|chunk| {
            let content: String = chunk.iter().collect();
            json!({"type": "text", "text": {"content": content}})
        })
        .collect()
}

#[derive(Deserialize)]
struct RichTextRun {
    #[serde(default)]
    plain_text: Option<String>,
    #[serde(default)]
    text: Option<TextContent>,
}

#[derive(Deserialize)]
struct TextContent {
    #[serde(default)]
    content: String,
}

impl RichTextRun {
    fn into_plain(self) -> String {
        match (self.plain_text, self.text) {
            (Some(plain), _) => plain,
            (None, Some(text)) => text.content,
            (None, None) => String::new(),
        }
    }
}

/// Decode one block object of a listing or append response.
pub fn decode_block(raw: &JsonValue) -> Result<Block, RemoteError> {
    let id = raw
        .get("id")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| RemoteError::decode("block object without an id"))?;
    let type_name = raw
        .get("type")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| RemoteError::decode(format!("block {} without a type", id)))?;

    let runs = raw
        .get(type_name)
        .and_then(|payload| payload.get("rich_text").or_else(|| payload.get("text")))
        .cloned()
        .unwrap_or(JsonValue::Array(Vec::new()));
    let runs: Vec<RichTextRun> = serde_json::from_value(runs)
        .map_err(|e| RemoteError::decode(format!("rich text of block {}: {}", id, e)))?;
    let text: String = runs.into_iter().map(RichTextRun::into_plain).collect();

    Ok(Block::new(BlockKind::from_type_name(type_name), text).with_remote_id(id))
}

/// Decode the `results` array of a list or append response.
pub fn decode_results(body: &JsonValue) -> Result<Vec<Block>, RemoteError> {
    body.get("results")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| RemoteError::decode("response has no results array"))?
        .iter()
        .map(decode_block)
        .collect()
}
