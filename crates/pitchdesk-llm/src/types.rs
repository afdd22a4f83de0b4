//! Wire types for the Messages API as relayed by the proxy endpoint.

use serde::{Deserialize, Serialize};

/// Web search tool made available to the research request.
pub const WEB_SEARCH_TOOL: Tool = Tool {
    kind: "web_search_20250305",
    name: "web_search",
};

#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub tools: &'a [Tool],
}

#[derive(Debug, Serialize)]
pub struct Message<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> Message<'a> {
    #[must_use]
    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// One block of model output. Only `text` blocks carry prose; tool-use and
/// search-result blocks are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagesResponse {
    /// Text of every `text` block, in response order.
    pub fn text_segments(&self) -> impl Iterator<Item = &str> {
        self.content
            .iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text.as_deref())
    }

    /// All text blocks joined with nothing in between.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.text_segments().collect()
    }

    /// All text blocks, each followed by a newline.
    #[must_use]
    pub fn text_lines(&self) -> String {
        self.text_segments().fold(String::new(), |mut acc, segment| {
            acc.push_str(segment);
            acc.push('\n');
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: serde_json::Value) -> MessagesResponse {
        serde_json::from_value(json).expect("valid response")
    }

    #[test]
    fn request_omits_empty_tools() {
        let request = MessagesRequest {
            model: "m",
            max_tokens: 10,
            messages: vec![Message::user("hi")],
            tools: &[],
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert!(json.get("tools").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn request_includes_web_search_tool() {
        let tools = [WEB_SEARCH_TOOL];
        let request = MessagesRequest {
            model: "m",
            max_tokens: 10,
            messages: vec![Message::user("hi")],
            tools: &tools,
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            json["tools"],
            serde_json::json!([{ "type": "web_search_20250305", "name": "web_search" }])
        );
    }

    #[test]
    fn only_text_blocks_contribute() {
        let resp = response(serde_json::json!({
            "content": [
                { "type": "text", "text": "Acme " },
                { "type": "server_tool_use", "id": "x", "name": "web_search", "input": {} },
                { "type": "web_search_tool_result", "content": [] },
                { "type": "text", "text": "raised funds." }
            ]
        }));
        assert_eq!(resp.joined_text(), "Acme raised funds.");
        assert_eq!(resp.text_lines(), "Acme \nraised funds.\n");
    }

    #[test]
    fn missing_content_is_empty() {
        let resp = response(serde_json::json!({ "id": "msg_1" }));
        assert_eq!(resp.joined_text(), "");
    }
}
