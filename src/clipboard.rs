//! Clipboard access for the Copy command.
//!
//! `tabba` exits right after copying, so the text has to outlive the
//! process. Two transports, tried in order:
//! 1. OSC 52 when stdout is a terminal. The terminal owns the text from then on.
//! 2. The system clipboard via `arboard`. On Linux the X11/Wayland selection
//!    dies with its owner, so we keep serving it until another program
//!    (usually a clipboard manager) takes it over.

use std::io::{IsTerminal, Write};

use base64::Engine;

/// How the text reached the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Osc52,
    System,
}

/// Puts `text` on the clipboard. Returns once the text is retained.
pub fn copy(text: &str) -> Result<Transport, arboard::Error> {
    let mut stdout = std::io::stdout();
    if stdout.is_terminal() {
        match write_osc52(&mut stdout, text) {
            Ok(()) => return Ok(Transport::Osc52),
            Err(e) => tracing::debug!("OSC 52 failed, trying system clipboard: {}", e),
        }
    }

    copy_system(text)?;
    Ok(Transport::System)
}

/// The OSC 52 escape sequence that sets the system clipboard to `text`.
fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text);
    format!("\x1b]52;c;{encoded}\x1b\\")
}

fn write_osc52(out: &mut impl Write, text: &str) -> std::io::Result<()> {
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn copy_system(text: &str) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    let mut clipboard = arboard::Clipboard::new()?;
    tracing::info!("Serving clipboard until another program takes it");
    clipboard.set().wait().text(text)
}

#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
fn copy_system(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text)
}
