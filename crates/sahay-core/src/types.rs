//! Shared domain types: messages, the persisted record format, and the
//! supported spoken languages.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// Structured link data for a clinic result.
///
/// Producers never build markup strings; the rendering boundary in the
/// session crate synthesizes the anchor from these fields and escapes both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLink {
    /// Short display label (the place name before the first comma).
    pub label: String,
    /// Map-search URL built from the full place description.
    pub url: String,
}

/// The content of a message: plain text, or a labeled map link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Plain(String),
    Link(MapLink),
}

impl MessageBody {
    /// The plain display text of this body (a link's label).
    pub fn display_text(&self) -> &str {
        match self {
            MessageBody::Plain(text) => text,
            MessageBody::Link(link) => &link.label,
        }
    }
}

/// One entry in the conversation log.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Unique within a session. Required to locate and remove transient
    /// placeholder entries before their result is known.
    pub id: Uuid,
    pub sender: Sender,
    pub body: MessageBody,
    /// Snapshot of the text of the message this one responds to, not a live
    /// link. The referenced message may later be deleted without affecting
    /// this field.
    pub reply_to: Option<String>,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    /// Build a user message, optionally threaded under a prior message.
    pub fn user(text: impl Into<String>, reply_to: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::User,
            body: MessageBody::Plain(text.into()),
            reply_to,
            sent_at: Utc::now(),
        }
    }

    /// Build a plain bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Bot,
            body: MessageBody::Plain(text.into()),
            reply_to: None,
            sent_at: Utc::now(),
        }
    }

    /// Build a bot message carrying a clinic map link.
    pub fn bot_link(link: MapLink) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Bot,
            body: MessageBody::Link(link),
            reply_to: None,
            sent_at: Utc::now(),
        }
    }

    /// The plain display text of this message.
    pub fn text(&self) -> &str {
        self.body.display_text()
    }
}

/// Persisted form of a [`Message`].
///
/// Serialized as `{id, sender, text, reply_to?, link?, sent_at}` in
/// insertion order. Link bodies are stored as their structured fields, never
/// as pre-built markup, so a reload reproduces the in-memory log exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<MapLink>,
    pub sent_at: DateTime<Utc>,
}

impl From<&Message> for MessageRecord {
    fn from(msg: &Message) -> Self {
        let (text, link) = match &msg.body {
            MessageBody::Plain(text) => (text.clone(), None),
            MessageBody::Link(link) => (link.label.clone(), Some(link.clone())),
        };
        Self {
            id: msg.id,
            sender: msg.sender,
            text,
            reply_to: msg.reply_to.clone(),
            link,
            sent_at: msg.sent_at,
        }
    }
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        let body = match record.link {
            Some(link) => MessageBody::Link(link),
            None => MessageBody::Plain(record.text),
        };
        Self {
            id: record.id,
            sender: record.sender,
            body,
            reply_to: record.reply_to,
            sent_at: record.sent_at,
        }
    }
}

/// The eleven supported spoken languages, identified by BCP 47 locale tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en-IN")]
    English,
    #[default]
    #[serde(rename = "hi-IN")]
    Hindi,
    #[serde(rename = "bn-IN")]
    Bengali,
    #[serde(rename = "gu-IN")]
    Gujarati,
    #[serde(rename = "ta-IN")]
    Tamil,
    #[serde(rename = "te-IN")]
    Telugu,
    #[serde(rename = "mr-IN")]
    Marathi,
    #[serde(rename = "pa-IN")]
    Punjabi,
    #[serde(rename = "kn-IN")]
    Kannada,
    #[serde(rename = "ml-IN")]
    Malayalam,
    #[serde(rename = "ur-IN")]
    Urdu,
}

impl Language {
    /// All supported languages, in menu order.
    pub const ALL: [Language; 11] = [
        Language::English,
        Language::Hindi,
        Language::Bengali,
        Language::Gujarati,
        Language::Tamil,
        Language::Telugu,
        Language::Marathi,
        Language::Punjabi,
        Language::Kannada,
        Language::Malayalam,
        Language::Urdu,
    ];

    /// The locale tag, e.g. `hi-IN`.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::English => "en-IN",
            Language::Hindi => "hi-IN",
            Language::Bengali => "bn-IN",
            Language::Gujarati => "gu-IN",
            Language::Tamil => "ta-IN",
            Language::Telugu => "te-IN",
            Language::Marathi => "mr-IN",
            Language::Punjabi => "pa-IN",
            Language::Kannada => "kn-IN",
            Language::Malayalam => "ml-IN",
            Language::Urdu => "ur-IN",
        }
    }

    /// Human-readable name shown in the language menu.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English (India)",
            Language::Hindi => "Hindi",
            Language::Bengali => "Bengali",
            Language::Gujarati => "Gujarati",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Marathi => "Marathi",
            Language::Punjabi => "Punjabi",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
            Language::Urdu => "Urdu",
        }
    }

    /// Parse a locale tag back into a language.
    pub fn from_tag(tag: &str) -> Option<Language> {
        Language::ALL.iter().copied().find(|l| l.tag() == tag)
    }

    /// The "could not reach the assistant" notice in this language.
    ///
    /// Used whenever the completion backend fails; the turn still completes
    /// with this text as the bot reply.
    pub fn unreachable_notice(&self) -> &'static str {
        match self {
            Language::English => "\u{26a0}\u{fe0f} Could not reach the assistant. Please try again.",
            Language::Hindi => "\u{26a0}\u{fe0f} AI से संपर्क नहीं हो सका।",
            Language::Bengali => "\u{26a0}\u{fe0f} সহকারীর সাথে যোগাযোগ করা যায়নি।",
            Language::Gujarati => "\u{26a0}\u{fe0f} સહાયકનો સંપર્ક થઈ શક્યો નથી.",
            Language::Tamil => "\u{26a0}\u{fe0f} உதவியாளரை தொடர்பு கொள்ள முடியவில்லை.",
            Language::Telugu => "\u{26a0}\u{fe0f} సహాయకుడిని సంప్రదించలేకపోయాము.",
            Language::Marathi => "\u{26a0}\u{fe0f} सहाय्यकाशी संपर्क होऊ शकला नाही.",
            Language::Punjabi => "\u{26a0}\u{fe0f} ਸਹਾਇਕ ਨਾਲ ਸੰਪਰਕ ਨਹੀਂ ਹੋ ਸਕਿਆ।",
            Language::Kannada => "\u{26a0}\u{fe0f} ಸಹಾಯಕನನ್ನು ಸಂಪರ್ಕಿಸಲು ಸಾಧ್ಯವಾಗಲಿಲ್ಲ.",
            Language::Malayalam => "\u{26a0}\u{fe0f} സഹായിയുമായി ബന്ധപ്പെടാനായില്ല.",
            Language::Urdu => "\u{26a0}\u{fe0f} معاون سے رابطہ نہیں ہو سکا۔",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// =============================================================================
// Tests
// =============================================================================
