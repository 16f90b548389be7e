//! Application entry point — voice chat client.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the tokio runtime (multi-thread, 2 workers).
//! 4. Build the HTTP transcription and chat clients from config.
//! 5. Build the capture session over the default `cpal` device.
//! 6. Drive the [`InteractionController`] from a stdin command loop — a thin
//!    stand-in for a real presentation layer; it maps lines to events and
//!    renders the shared view after each one.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use voice_chat::audio::{CaptureSession, CpalDevice};
use voice_chat::config::AppConfig;
use voice_chat::controller::{InteractionController, InteractionEvent, SharedView};
use voice_chat::remote::{HttpChatClient, HttpTranscriptionClient};

const HELP: &str = "\
commands:
  record        start a microphone capture
  stop          stop the capture and transcribe it
  file <path>   transcribe an audio file instead
  edit          make the transcript editable
  save <text>   commit edited transcript text
  send          send the transcript to the assistant
  ok            acknowledge a displayed error
  log           reprint the whole conversation
  quit          exit";

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("voice chat client starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    log::info!(
        "services: transcribe={} chat={}",
        config.transcribe_url,
        config.chat_url
    );

    // 3. Tokio runtime (2 workers — one per remote client)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    // 4–5. Clients and capture session
    let transcriber = Arc::new(HttpTranscriptionClient::from_config(&config));
    let chat = Arc::new(HttpChatClient::from_config(&config));
    let session = CaptureSession::new(Arc::new(CpalDevice::new()));

    let mut controller = InteractionController::new(session, transcriber, chat);
    let view = controller.view();

    // 6. Command loop
    println!("{HELP}\n");
    let stdin = std::io::stdin();
    let mut rendered_messages = 0;

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let event = match parse_command(line.trim()) {
            Command::Event(event) => event,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Log => {
                render_log(&view, 0);
                continue;
            }
            Command::Quit => break,
            Command::Empty => continue,
            Command::Unknown(word) => {
                println!("unknown command: {word} (try 'help')");
                continue;
            }
        };

        if let Err(rejection) = rt.block_on(controller.handle_event(event)) {
            println!("rejected: {rejection}");
        }
        rendered_messages = render_view(&view, rendered_messages);
    }

    log::info!("voice chat client shutting down");
    Ok(())
}

// ---------------------------------------------------------------------------
// Command parsing
// ---------------------------------------------------------------------------

enum Command {
    Event(InteractionEvent),
    Help,
    Log,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "" => Command::Empty,
        "record" => Command::Event(InteractionEvent::StartCapture),
        "stop" => Command::Event(InteractionEvent::StopCapture),
        "file" => {
            let selection = (!rest.is_empty()).then(|| PathBuf::from(rest));
            Command::Event(InteractionEvent::FileSelected(selection))
        }
        "edit" => Command::Event(InteractionEvent::EditRequested),
        "save" => Command::Event(InteractionEvent::SaveTranscript(rest.to_string())),
        "send" => Command::Event(InteractionEvent::Send),
        "ok" => Command::Event(InteractionEvent::AcknowledgeError),
        "help" => Command::Help,
        "log" => Command::Log,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Print state, pending transcript, and any log entries added since the last
/// render.  Returns the new rendered-message count.
fn render_view(view: &SharedView, rendered_messages: usize) -> usize {
    let view = view.lock().unwrap();

    println!("[{}]", view.state.label());
    if let Some(transcript) = &view.transcript {
        println!("transcript: {transcript}");
    }
    for message in &view.log.messages()[rendered_messages..] {
        println!("{}: {}", message.role.label(), message.content);
    }
    view.log.len()
}

/// Reprint the conversation from `from` onward.
fn render_log(view: &SharedView, from: usize) {
    let view = view.lock().unwrap();
    for message in &view.log.messages()[from..] {
        println!("{}: {}", message.role.label(), message.content);
    }
}
