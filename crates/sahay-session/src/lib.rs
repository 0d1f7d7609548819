//! Conversation session engine for Sahay.
//!
//! Owns the ordered message log, the reply-threading and location
//! sub-dialog state, and the selected spoken language; orchestrates the
//! persistence, completion, clinic-lookup, and speech adapters in response
//! to user intents; and emits the render model the presentation layer
//! consumes.

pub mod dialog;
pub mod engine;
pub mod error;
pub mod render;
pub mod tips;

pub use dialog::LocationDialog;
pub use engine::{EngineConfig, SessionEngine};
pub use error::SessionError;
pub use render::{escape_html, render_message, RenderModel, RenderedMessage};
pub use tips::FIRST_AID_TIPS;
