//! The rendering boundary.
//!
//! This is the only place markup is synthesized. Producers hand the engine
//! plain text or structured [`MapLink`] fields; every interpolated string is
//! escaped here, so untrusted text (place names, completion replies) cannot
//! break out of the anchor structure the presentation renders verbatim.

use serde::Serialize;

use sahay_core::types::{Language, Message, MessageBody, Sender};

/// One message prepared for display. `html` contains escaped text and, for
/// clinic results, a single synthesized anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMessage {
    pub sender: Sender,
    pub html: String,
    pub reply_to: Option<String>,
}

/// Everything the presentation layer needs to draw the conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderModel {
    pub messages: Vec<RenderedMessage>,
    pub input_buffer: String,
    pub language: Language,
    pub reply_target_text: Option<String>,
    pub is_listening: bool,
    pub is_sending: bool,
    pub awaiting_location: bool,
}

/// Escape text for interpolation into markup (element content or a quoted
/// attribute value).
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render one message. Reply snapshots are escaped by the same rule when
/// the presentation displays them, so they are passed through as data.
pub fn render_message(msg: &Message) -> RenderedMessage {
    let html = match &msg.body {
        MessageBody::Plain(text) => escape_html(text),
        MessageBody::Link(link) => format!(
            "\u{1f4cd} <a href=\"{}\" target=\"_blank\">{}</a>",
            escape_html(&link.url),
            escape_html(&link.label)
        ),
    };
    RenderedMessage {
        sender: msg.sender,
        html,
        reply_to: msg.reply_to.clone(),
    }
}

/// Render the whole log in insertion order.
pub fn render_messages(messages: &[Message]) -> Vec<RenderedMessage> {
    messages.iter().map(render_message).collect()
}

// =============================================================================
// Tests
// =============================================================================
