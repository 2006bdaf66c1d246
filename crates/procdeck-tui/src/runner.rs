//! Main TUI runner - terminal lifecycle and event loop
//!
//! Each pass of the loop:
//! 1. drain messages produced by background tasks
//! 2. keep the terminal pane size in sync with the session
//! 3. render
//! 4. poll one terminal event (or tick)

use ratatui::DefaultTerminal;

use procdeck_app::{Engine, Message};
use procdeck_client::Backend;
use procdeck_core::prelude::*;

use crate::{event, layout, render};

/// Run the dashboard until the user quits or a signal arrives.
///
/// The caller owns engine startup and shutdown; this only owns the terminal.
pub async fn run<B>(engine: &mut Engine<B>) -> Result<()>
where
    B: Backend + Sync + 'static,
{
    install_panic_hook();
    let mut term = ratatui::try_init().map_err(|e| Error::TerminalInit(e.to_string()))?;
    info!("TUI started");

    let result = run_loop(&mut term, engine);

    let restored = ratatui::try_restore().map_err(|e| Error::TerminalRestore(e.to_string()));
    match &result {
        Err(e) if e.is_fatal() => error!("TUI loop failed: {}", e),
        Err(e) => warn!("TUI loop stopped: {}", e),
        Ok(()) => {}
    }
    result.and(restored)
}

/// Restore the terminal before the default panic output is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));
}

fn run_loop<B>(terminal: &mut DefaultTerminal, engine: &mut Engine<B>) -> Result<()>
where
    B: Backend + Sync + 'static,
{
    while !engine.should_quit() {
        engine.drain_pending_messages();

        sync_terminal_viewport(terminal, engine)?;

        terminal
            .draw(|frame| render::view(frame, &engine.state))
            .map_err(|e| Error::terminal(format!("Failed to draw: {}", e)))?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }
    Ok(())
}

/// Tell the terminal session how large its pane is whenever that changes.
fn sync_terminal_viewport<B>(terminal: &DefaultTerminal, engine: &mut Engine<B>) -> Result<()>
where
    B: Backend + Sync + 'static,
{
    if !engine.state.terminal.is_active() {
        return Ok(());
    }
    let size = terminal
        .size()
        .map_err(|e| Error::terminal(format!("Failed to read terminal size: {}", e)))?;
    let areas = layout::create(ratatui::layout::Rect::new(0, 0, size.width, size.height));
    let (width, height) = layout::inner_size(areas.terminal);
    if engine.state.terminal.viewport() != Some((width, height)) {
        engine.process_message(Message::Resize { width, height });
    }
    Ok(())
}
