//! Speech capability ports for Sahay.
//!
//! The platform may or may not provide recognition and synthesis; both are
//! modeled as queryable ports with explicit unavailability outcomes rather
//! than null checks at call sites. Default adapters for platforms without
//! speech are included; real platform backends implement the same traits.

pub mod input;
pub mod output;
pub mod voices;

pub use input::{RecognitionError, SpeechInput, UnsupportedSpeechInput};
pub use output::{SilentSpeechOutput, SpeechOutput};
pub use voices::{Voice, VoiceCatalog};
