//! Rich message content: plain text interleaved with links.
//!
//! Rendering layers receive structured segments instead of pre-built markup,
//! so every piece of text can be escaped at the point of output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s]+").expect("URL pattern is valid"));

/// A piece of message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Segment {
    /// Literal text.
    Text(String),
    /// A URL; rendered as a link whose label is the URL itself.
    Link(String),
}

/// Ordered content segments of one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichContent {
    pub segments: Vec<Segment>,
}

impl RichContent {
    /// Content consisting of a single text segment.
    pub fn plain(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        Self {
            segments: vec![Segment::Text(text.to_string())],
        }
    }

    /// Splits `text` into text and link segments.
    ///
    /// A link runs from `http://` or `https://` to the next whitespace.
    pub fn linkify(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for found in URL_PATTERN.find_iter(text) {
            if found.start() > cursor {
                segments.push(Segment::Text(text[cursor..found.start()].to_string()));
            }
            segments.push(Segment::Link(found.as_str().to_string()));
            cursor = found.end();
        }

        if cursor < text.len() {
            segments.push(Segment::Text(text[cursor..].to_string()));
        }

        Self { segments }
    }

    /// Links contained in the content, in order.
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Link(url) => Some(url.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// The content flattened back to its original text.
    pub fn to_plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) | Segment::Link(text) => text.as_str(),
            })
            .collect()
    }
}
