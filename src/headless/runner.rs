//! Headless mode runner - main event loop without TUI
//!
//! Drives the same [`Engine`] as the TUI. Commands arrive as lines on stdin,
//! results leave as NDJSON on stdout.

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use procdeck_app::dispatcher::ActionKind;
use procdeck_app::{Engine, Message};
use procdeck_client::Backend;
use procdeck_core::prelude::*;
use procdeck_core::ExecId;

use super::HeadlessEvent;

/// Run in headless mode until stdin says `quit` or the process is signalled
pub async fn run_headless<B: Backend + Sync + 'static>(engine: &mut Engine<B>) -> Result<()> {
    info!("procdeck starting in HEADLESS mode ({})", engine.state.server_label);

    let stdin_tx = engine.msg_sender();
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(stdin_tx);
    });

    headless_event_loop(engine).await
}

/// Main headless event loop
async fn headless_event_loop<B: Backend + Sync + 'static>(engine: &mut Engine<B>) -> Result<()> {
    let mut tracker = EmitTracker::default();

    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        match engine.msg_rx.recv().await {
            Some(msg) => {
                emit_pre_message_events(&msg);
                engine.process_message(msg);
                tracker.emit_post_message_events(engine);
            }
            None => {
                info!("Message channel closed");
                break;
            }
        }
    }

    Ok(())
}

/// Emit events carried directly by a message
fn emit_pre_message_events(msg: &Message) {
    if let Message::CommandSettled {
        exec_id,
        kind,
        outcome,
    } = msg
    {
        let what = format!("{} {}", kind.verb(), exec_id);
        HeadlessEvent::command_settled(exec_id.as_str(), kind.verb(), outcome.failure_message(&what))
            .emit();
    }
}

/// Remembers what was already written so each state change prints once.
#[derive(Debug, Default)]
struct EmitTracker {
    applied_seq: u64,
    last_error: Option<String>,
}

impl EmitTracker {
    fn emit_post_message_events<B: Backend + Sync + 'static>(&mut self, engine: &Engine<B>) {
        let registry = &engine.state.registry;

        if registry.applied_seq() != self.applied_seq {
            self.applied_seq = registry.applied_seq();
            HeadlessEvent::snapshot(registry.services()).emit();
        }

        let error = registry.last_error().map(str::to_string);
        if error != self.last_error {
            if let Some(message) = &error {
                HeadlessEvent::error(message.clone()).emit();
            }
            self.last_error = error;
        }
    }
}

/// Translate one stdin line into a message
fn parse_command(line: &str) -> Option<Message> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?;
    let arg = parts.next();

    let kind = match verb {
        "q" | "quit" => return Some(Message::Quit),
        "refresh" => return Some(Message::RefreshRegistry),
        "start" => ActionKind::Start,
        "stop" => ActionKind::Stop,
        "restart" => ActionKind::Restart,
        _ => return None,
    };

    arg.map(|id| Message::RunCommand {
        exec_id: ExecId::from(id),
        kind,
    })
}

/// Read commands from stdin and forward them to the message channel (blocking version)
fn spawn_stdin_reader_blocking(msg_tx: mpsc::Sender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match parse_command(trimmed) {
                    Some(msg) => {
                        let quit = matches!(msg, Message::Quit);
                        info!("Stdin: {}", trimmed);
                        if msg_tx.blocking_send(msg).is_err() || quit {
                            break;
                        }
                    }
                    None => warn!("Unknown stdin command: {}", trimmed),
                }
            }
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    info!("Stdin reader exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use procdeck_app::test_utils::{test_service, FakeBackend};
    use procdeck_app::Settings;

    #[test]
    fn test_parse_lifecycle_commands() {
        match parse_command("stop svc1") {
            Some(Message::RunCommand { exec_id, kind }) => {
                assert_eq!(exec_id.as_str(), "svc1");
                assert_eq!(kind, ActionKind::Stop);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            parse_command("restart  api "),
            Some(Message::RunCommand {
                kind: ActionKind::Restart,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_requires_id() {
        assert!(parse_command("start").is_none());
    }

    #[test]
    fn test_parse_quit_and_refresh() {
        assert!(matches!(parse_command("q"), Some(Message::Quit)));
        assert!(matches!(parse_command("quit"), Some(Message::Quit)));
        assert!(matches!(parse_command("refresh"), Some(Message::RefreshRegistry)));
    }

    #[test]
    fn test_parse_unknown() {
        assert!(parse_command("reload").is_none());
    }

    #[tokio::test]
    async fn test_tracker_follows_accepted_snapshots() {
        let mut engine = Engine::new(FakeBackend::new(), Settings::default(), "fake");
        let mut tracker = EmitTracker::default();

        tracker.emit_post_message_events(&engine);
        assert_eq!(tracker.applied_seq, 0);

        let seq = engine.state.registry.issue();
        engine.process_message(Message::RegistryFetched {
            seq,
            result: Ok(vec![test_service("svc1", "web")]),
        });
        tracker.emit_post_message_events(&engine);
        assert_eq!(tracker.applied_seq, seq);

        let seq = engine.state.registry.issue();
        engine.process_message(Message::RegistryFetched {
            seq,
            result: Err("refused".to_string()),
        });
        tracker.emit_post_message_events(&engine);
        assert_eq!(tracker.last_error.as_deref(), Some("refused"));
    }
}
