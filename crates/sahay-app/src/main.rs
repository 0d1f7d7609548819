//! Sahay application binary - composition root.
//!
//! Ties together the Sahay crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Initialize the SQLite-backed history store
//! 3. Build the completion and clinic-lookup clients
//! 4. Construct the session engine
//! 5. Run a terminal shell that forwards intents and prints the render model
//!
//! The shell is deliberately thin: everything stateful lives in the engine.

mod cli;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use sahay_core::config::SahayConfig;
use sahay_core::types::{Language, Sender};
use sahay_remote::{HttpCompletionClient, NominatimLocator};
use sahay_session::{EngineConfig, RenderModel, SessionEngine, SessionError};
use sahay_speech::{SilentSpeechOutput, UnsupportedSpeechInput, VoiceCatalog};
use sahay_storage::ProfileStore;

use cli::CliArgs;

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}

/// Print messages the user has not seen yet and return the new count.
fn print_new_messages(model: &RenderModel, shown: usize) -> usize {
    for msg in &model.messages[shown.min(model.messages.len())..] {
        let who = match msg.sender {
            Sender::User => "you",
            Sender::Bot => "bot",
        };
        match &msg.reply_to {
            Some(target) => println!("[{}] (re: {}) {}", who, target, msg.html),
            None => println!("[{}] {}", who, msg.html),
        }
    }
    model.messages.len()
}

fn print_help() {
    println!("Commands:");
    println!("  /clinics        find clinics near you (asks for your city)");
    println!("  /tips           show first aid and wellness tips");
    println!("  /lang <tag>     switch language (e.g. /lang ta-IN)");
    println!("  /langs          list supported languages");
    println!("  /reply <n>      thread your next message under message n");
    println!("  /reply          clear the reply target");
    println!("  /voice          dictate your next message");
    println!("  /reset          clear the conversation");
    println!("  /quit           exit");
    println!("Anything else is sent to the assistant.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let config_path = args.resolve_config_path();
    let mut config = SahayConfig::load_or_default(&config_path);

    if let Some(data_dir) = args.resolve_data_dir() {
        config.general.data_dir = data_dir;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }
    if let Some(ref language) = args.language {
        config.general.language = language.clone();
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.general.log_level.clone())),
        )
        .init();

    tracing::info!("Starting Sahay v{}", env!("CARGO_PKG_VERSION"));

    // The API key may come from the environment instead of the config file.
    if config.assistant.api_key.is_empty() {
        if let Ok(key) = std::env::var("SAHAY_API_KEY") {
            config.assistant.api_key = key;
        }
    }

    let db_path = resolve_data_dir(&config.general.data_dir).join(&config.storage.db_file);
    let store = Arc::new(ProfileStore::open(&db_path)?);
    let completion = Arc::new(HttpCompletionClient::new(&config.assistant));
    let clinics = Arc::new(NominatimLocator::new(&config.clinics));
    let speech_in = Arc::new(UnsupportedSpeechInput);
    let speech_out = Arc::new(SilentSpeechOutput::new(VoiceCatalog::default()));

    let engine = SessionEngine::new(
        store,
        completion,
        clinics,
        speech_in,
        speech_out,
        EngineConfig::from_config(&config),
    )?;

    println!("Sahay — Bharat Health Ally. Type /help for commands.");
    let mut shown = print_new_messages(&engine.render_model(), 0);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let model = engine.render_model();
        if model.awaiting_location {
            print!("(your city) ");
        }
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();

        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [] => continue,
            ["/quit"] | ["/exit"] => break,
            ["/help"] => print_help(),
            ["/reset"] => {
                engine.reset_conversation()?;
                shown = 0;
                println!("(conversation cleared)");
            }
            ["/tips"] => engine.show_first_aid_tips().await?,
            ["/clinics"] => engine.begin_clinic_flow()?,
            ["/langs"] => {
                for lang in Language::ALL {
                    println!("  {}  {}", lang.tag(), lang.display_name());
                }
            }
            ["/lang", tag] => match Language::from_tag(tag) {
                Some(lang) => {
                    engine.select_language(lang)?;
                    println!("(language set to {})", lang.display_name());
                }
                None => println!("(unknown language tag; try /langs)"),
            },
            ["/reply"] => {
                engine.set_reply_target(None)?;
                println!("(reply target cleared)");
            }
            ["/reply", index] => match index.parse::<usize>() {
                Ok(n) if n < engine.messages().len() => {
                    let target = engine.messages()[n].clone();
                    println!("(replying to: {})", target.text());
                    engine.set_reply_target(Some(target))?;
                }
                _ => println!("(no message with that number)"),
            },
            ["/voice"] => match engine.start_voice_capture().await {
                Ok(()) => {
                    let buffer = engine.render_model().input_buffer;
                    if buffer.is_empty() {
                        println!("(nothing heard)");
                    } else {
                        println!("(heard: {})", buffer);
                    }
                }
                Err(SessionError::SpeechUnavailable) => {
                    println!("Speech recognition is not supported here.");
                }
                Err(e) => return Err(e.into()),
            },
            _ => engine.submit_text(&line).await?,
        }

        shown = print_new_messages(&engine.render_model(), shown);
    }

    tracing::info!("Sahay exiting");
    Ok(())
}
