//! The conversation session engine.
//!
//! Coordinates the persistence, completion, clinic-lookup, and speech
//! adapters in response to user intents. All adapter calls are async and
//! non-blocking; the engine serializes whole turns so a second submission
//! can never interleave with an unresolved one, and every append or
//! replace persists the full log before the engine yields.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use sahay_core::config::SahayConfig;
use sahay_core::types::{Language, MapLink, Message, MessageRecord};
use sahay_remote::{ClinicLocator, CompletionClient};
use sahay_speech::{RecognitionError, SpeechInput, SpeechOutput};
use sahay_storage::HistoryStore;

use crate::dialog::LocationDialog;
use crate::error::SessionError;
use crate::render::{render_messages, RenderModel};
use crate::tips::FIRST_AID_TIPS;

/// Bot message asking for a city when the clinic flow begins.
const CLINIC_PROMPT: &str = "\u{1f4cd} Please tell me your city (e.g., Delhi).";

/// Engine settings, usually derived from [`SahayConfig`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Initially selected spoken language.
    pub language: Language,
    /// Maximum characters of a completion reply that are stored and
    /// displayed; longer replies get a trailing ellipsis. Speech output
    /// always receives the untruncated reply.
    pub reply_char_limit: usize,
    /// Pause between consecutive spoken first-aid tips.
    pub tip_stagger: Duration,
    /// Whether replies are spoken at all.
    pub speech_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            reply_char_limit: 400,
            tip_stagger: Duration::from_millis(2500),
            speech_enabled: true,
        }
    }
}

impl EngineConfig {
    pub fn from_config(config: &SahayConfig) -> Self {
        Self {
            language: Language::from_tag(&config.general.language).unwrap_or_default(),
            reply_char_limit: config.assistant.reply_char_limit,
            tip_stagger: Duration::from_secs_f64(config.speech.tip_stagger_secs.max(0.0)),
            speech_enabled: config.speech.enabled,
        }
    }
}

/// Mutable session state, created fresh on every engine construction.
#[derive(Debug)]
struct SessionState {
    messages: Vec<Message>,
    input_buffer: String,
    language: Language,
    dialog: LocationDialog,
    reply_target: Option<Message>,
    is_listening: bool,
    is_sending: bool,
    /// Bumped by `reset_conversation`; in-flight flows capture the value at
    /// turn start and discard their result if it has moved on.
    generation: u64,
}

/// What a submitted text turns into, decided while the state lock is held.
enum TurnKind {
    AiReply { reply_to: Option<String> },
    ClinicSearch,
}

/// The conversation session engine.
pub struct SessionEngine {
    state: Mutex<SessionState>,
    /// Serializes turns: a second `submit_text` waits for the first to
    /// resolve, which keeps the placeholder replace step a critical section.
    turn_lock: tokio::sync::Mutex<()>,
    store: Arc<dyn HistoryStore>,
    completion: Arc<dyn CompletionClient>,
    clinics: Arc<dyn ClinicLocator>,
    speech_in: Arc<dyn SpeechInput>,
    speech_out: Arc<dyn SpeechOutput>,
    render_tx: watch::Sender<RenderModel>,
    config: EngineConfig,
}

impl SessionEngine {
    /// Create an engine, restoring persisted history.
    ///
    /// On the first load of a new session (no session marker yet) any stale
    /// persisted history is discarded before reading; reloads within the
    /// same session restore it unchanged.
    pub fn new(
        store: Arc<dyn HistoryStore>,
        completion: Arc<dyn CompletionClient>,
        clinics: Arc<dyn ClinicLocator>,
        speech_in: Arc<dyn SpeechInput>,
        speech_out: Arc<dyn SpeechOutput>,
        config: EngineConfig,
    ) -> Result<Self, SessionError> {
        if !store.session_seen()? {
            debug!("Fresh session detected, discarding stale history");
            store.clear()?;
            store.mark_session_seen()?;
        }

        let messages: Vec<Message> = store.load()?.into_iter().map(Message::from).collect();

        let state = SessionState {
            messages,
            input_buffer: String::new(),
            language: config.language,
            dialog: LocationDialog::default(),
            reply_target: None,
            is_listening: false,
            is_sending: false,
            generation: 0,
        };
        let (render_tx, _) = watch::channel(Self::build_render(&state));

        Ok(Self {
            state: Mutex::new(state),
            turn_lock: tokio::sync::Mutex::new(()),
            store,
            completion,
            clinics,
            speech_in,
            speech_out,
            render_tx,
            config,
        })
    }

    // -- Render model --

    /// The current render model.
    pub fn render_model(&self) -> RenderModel {
        self.render_tx.borrow().clone()
    }

    /// Subscribe to render model updates.
    pub fn subscribe(&self) -> watch::Receiver<RenderModel> {
        self.render_tx.subscribe()
    }

    /// Snapshot of the message log.
    pub fn messages(&self) -> Vec<Message> {
        match self.state.lock() {
            Ok(st) => st.messages.clone(),
            Err(_) => Vec::new(),
        }
    }

    // -- Public operations --

    /// Submit the user's text. Blank input is a no-op.
    ///
    /// While the location sub-dialog is awaiting an answer the text is read
    /// as a city name and routed to the clinic search; otherwise it goes to
    /// the AI reply flow.
    pub async fn submit_text(&self, raw: &str) -> Result<(), SessionError> {
        let text = raw.trim().to_string();
        if text.is_empty() {
            return Ok(());
        }

        let _turn = self.turn_lock.lock().await;

        let (kind, generation, language) = {
            let mut st = self.lock_state()?;
            let reply_to = st.reply_target.take().map(|m| m.text().to_string());
            st.messages.push(Message::user(text.clone(), reply_to.clone()));
            st.input_buffer.clear();
            st.is_sending = true;

            let kind = if st.dialog.is_awaiting() {
                st.dialog.resolve();
                TurnKind::ClinicSearch
            } else {
                TurnKind::AiReply { reply_to }
            };

            self.persist(&st)?;
            self.publish(&st);
            (kind, st.generation, st.language)
        };

        match kind {
            TurnKind::AiReply { reply_to } => {
                self.ai_reply_turn(&text, reply_to, generation, language)
                    .await
            }
            TurnKind::ClinicSearch => self.clinic_search_turn(&text, generation, language).await,
        }
    }

    /// Replace the uncommitted input buffer.
    pub fn set_input(&self, text: &str) -> Result<(), SessionError> {
        let mut st = self.lock_state()?;
        st.input_buffer = text.to_string();
        self.publish(&st);
        Ok(())
    }

    /// Capture one spoken utterance into the input buffer.
    ///
    /// Returns [`SessionError::SpeechUnavailable`] if the platform has no
    /// recognition capability; the caller surfaces that as an immediate
    /// notice. Recognition that ends without a result silently resets the
    /// listening indicator and leaves the buffer untouched.
    pub async fn start_voice_capture(&self) -> Result<(), SessionError> {
        if !self.speech_in.is_available() {
            return Err(SessionError::SpeechUnavailable);
        }

        let language = {
            let mut st = self.lock_state()?;
            st.is_listening = true;
            self.publish(&st);
            st.language
        };

        let result = self.speech_in.recognize(language).await;

        let mut st = self.lock_state()?;
        st.is_listening = false;
        match result {
            Ok(transcript) => {
                st.input_buffer = transcript;
                self.publish(&st);
                Ok(())
            }
            Err(RecognitionError::Unavailable) => {
                self.publish(&st);
                Err(SessionError::SpeechUnavailable)
            }
            Err(e) => {
                debug!(error = %e, "Recognition ended without a transcript");
                self.publish(&st);
                Ok(())
            }
        }
    }

    /// Speak arbitrary text in the currently selected language.
    pub fn speak(&self, text: &str) -> Result<(), SessionError> {
        if !self.config.speech_enabled {
            return Ok(());
        }
        let language = self.lock_state()?.language;
        self.speech_out.speak(text, language);
        Ok(())
    }

    /// Switch the spoken language. Affects subsequent calls only; an
    /// in-flight request keeps the language it was started with.
    pub fn select_language(&self, language: Language) -> Result<(), SessionError> {
        let mut st = self.lock_state()?;
        st.language = language;
        self.publish(&st);
        Ok(())
    }

    /// Start the clinic sub-dialog: ask for a city and read the next
    /// submission as the answer. Idempotent while already awaiting.
    pub fn begin_clinic_flow(&self) -> Result<(), SessionError> {
        let mut st = self.lock_state()?;
        st.dialog.begin();
        st.messages.push(Message::bot(CLINIC_PROMPT));
        self.persist(&st)?;
        self.publish(&st);
        Ok(())
    }

    /// Append the fixed first-aid tip list as consecutive bot messages in
    /// one persisted batch, and speak the tips fire-and-forget with a
    /// stagger between them.
    pub async fn show_first_aid_tips(&self) -> Result<(), SessionError> {
        let language = {
            let mut st = self.lock_state()?;
            for tip in FIRST_AID_TIPS {
                st.messages.push(Message::bot(tip));
            }
            self.persist(&st)?;
            self.publish(&st);
            st.language
        };

        if self.config.speech_enabled {
            let speech_out = Arc::clone(&self.speech_out);
            let stagger = self.config.tip_stagger;
            tokio::spawn(async move {
                for (i, tip) in FIRST_AID_TIPS.iter().enumerate() {
                    if i > 0 {
                        tokio::time::sleep(stagger).await;
                    }
                    speech_out.speak(tip, language);
                }
            });
        }
        Ok(())
    }

    /// Set or clear the message the next outgoing text is threaded under.
    pub fn set_reply_target(&self, target: Option<Message>) -> Result<(), SessionError> {
        let mut st = self.lock_state()?;
        st.reply_target = target;
        self.publish(&st);
        Ok(())
    }

    /// Clear the log, the input buffer, and the persisted history.
    ///
    /// Bumps the generation counter so a result still in flight discards
    /// itself instead of reappearing in the cleared log.
    pub fn reset_conversation(&self) -> Result<(), SessionError> {
        let mut st = self.lock_state()?;
        st.messages.clear();
        st.input_buffer.clear();
        st.reply_target = None;
        st.dialog.resolve();
        st.generation += 1;
        self.store.clear()?;
        self.publish(&st);
        Ok(())
    }

    // -- Turn flows --

    /// AI reply flow: build the (optionally threaded) prompt, ask the
    /// completion backend, append the bounded reply, speak the full one.
    async fn ai_reply_turn(
        &self,
        raw: &str,
        reply_to: Option<String>,
        generation: u64,
        language: Language,
    ) -> Result<(), SessionError> {
        let prompt = match &reply_to {
            Some(target) => format!("Follow-up on: '{}'. User says: '{}'", target, raw),
            None => raw.to_string(),
        };

        let reply = match self.completion.complete(&prompt, language).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("Completion backend returned an empty reply");
                language.unreachable_notice().to_string()
            }
            Err(e) => {
                warn!(error = %e, "Completion backend failed");
                language.unreachable_notice().to_string()
            }
        };

        let display = truncate_reply(&reply, self.config.reply_char_limit);

        let applied = {
            let mut st = self.lock_state()?;
            st.is_sending = false;
            let current = st.generation == generation;
            if current {
                st.messages.push(Message::bot(display));
                self.persist(&st)?;
            } else {
                debug!("Discarding stale completion reply");
            }
            self.publish(&st);
            current
        };

        if applied && self.config.speech_enabled {
            self.speech_out.speak(&reply, language);
        }
        Ok(())
    }

    /// Clinic search flow: transient placeholder, single-attempt lookup,
    /// then one atomic remove-and-append with a single persist.
    async fn clinic_search_turn(
        &self,
        city: &str,
        generation: u64,
        language: Language,
    ) -> Result<(), SessionError> {
        let placeholder = Message::bot(format!(
            "\u{1f50e} Searching for clinics near \"{}\"...",
            city
        ));
        let placeholder_id = placeholder.id;
        {
            let mut st = self.lock_state()?;
            st.messages.push(placeholder);
            self.persist(&st)?;
            self.publish(&st);
        }

        let outcome = self.clinics.search(city).await;

        let spoken = {
            let mut st = self.lock_state()?;
            st.is_sending = false;
            if st.generation != generation {
                // The conversation was reset mid-flight; the placeholder
                // went with the rest of the log.
                debug!("Discarding stale clinic results");
                self.publish(&st);
                return Ok(());
            }

            remove_by_id(&mut st.messages, placeholder_id);
            let spoken = match outcome {
                Ok(hits) if hits.is_empty() => {
                    let text = format!("\u{26a0}\u{fe0f} No clinics found near \"{}\".", city);
                    st.messages.push(Message::bot(text.clone()));
                    Some(text)
                }
                Ok(hits) => {
                    st.messages.push(Message::bot("\u{1f9ed} Nearby clinics:"));
                    let count = hits.len();
                    for hit in hits {
                        st.messages.push(Message::bot_link(MapLink {
                            label: hit.label,
                            url: hit.maps_url,
                        }));
                    }
                    Some(format!("Nearby clinics found: {}", count))
                }
                Err(e) => {
                    st.messages.push(Message::bot(format!(
                        "\u{26a0}\u{fe0f} Error fetching clinic data: {}",
                        e
                    )));
                    None
                }
            };
            self.persist(&st)?;
            self.publish(&st);
            spoken
        };

        if let Some(text) = spoken {
            if self.config.speech_enabled {
                self.speech_out.speak(&text, language);
            }
        }
        Ok(())
    }

    // -- Private helpers --

    fn lock_state(&self) -> Result<MutexGuard<'_, SessionState>, SessionError> {
        self.state.lock().map_err(|_| SessionError::LockPoisoned)
    }

    /// Write the full log to the store. Called with the state lock held so
    /// readers never observe a log the store has not yet seen.
    fn persist(&self, st: &SessionState) -> Result<(), SessionError> {
        let records: Vec<MessageRecord> = st.messages.iter().map(MessageRecord::from).collect();
        self.store.save(&records)?;
        Ok(())
    }

    fn publish(&self, st: &SessionState) {
        self.render_tx.send_replace(Self::build_render(st));
    }

    fn build_render(st: &SessionState) -> RenderModel {
        RenderModel {
            messages: render_messages(&st.messages),
            input_buffer: st.input_buffer.clone(),
            language: st.language,
            reply_target_text: st.reply_target.as_ref().map(|m| m.text().to_string()),
            is_listening: st.is_listening,
            is_sending: st.is_sending,
            awaiting_location: st.dialog.is_awaiting(),
        }
    }
}

/// Bound a reply to `limit` characters, marking the cut with an ellipsis.
fn truncate_reply(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push('\u{2026}');
    out
}

/// Drop the message with the given id, if present.
fn remove_by_id(messages: &mut Vec<Message>, id: Uuid) {
    messages.retain(|m| m.id != id);
}

// =============================================================================
// Tests
// =============================================================================
