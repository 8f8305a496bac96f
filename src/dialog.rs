mod terminal;
mod zenity;

pub use terminal::Terminal;
pub use zenity::Zenity;

use crate::config::Tools;
use tracing::debug;

/// The three interactions the toggler needs from the user.
///
/// None of them can fail from the caller's point of view: a dialog that
/// cannot be shown counts as "no" for [`Dialog::confirm`] and as a
/// cancellation for [`Dialog::password`].
pub trait Dialog {
    /// Show an error message and wait until it is dismissed.
    fn error(&self, message: &str);
    /// Ask a yes/no question, `true` when accepted.
    fn confirm(&self, message: &str) -> bool;
    /// Ask for a password with masked input, `None` when cancelled.
    fn password(&self, message: &str) -> Option<String>;
}

/// Pick the graphical dialog utility when there is a display to show it on
/// and the program exists, the terminal otherwise.
pub fn select(tools: &Tools) -> Box<dyn Dialog> {
    if tools.uses_terminal_dialog() {
        debug!("Terminal dialogs requested");
        return Box::new(Terminal);
    }
    let has_display = ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|v| !v.is_empty()));
    if !has_display {
        debug!("No graphical session, falling back to terminal dialogs");
        return Box::new(Terminal);
    }
    match which::which(&tools.dialog) {
        Ok(path) => {
            debug!(?path, "Using graphical dialogs");
            Box::new(Zenity::new(path))
        }
        Err(e) => {
            debug!(dialog = ?tools.dialog, "Dialog program unavailable ({e}), using terminal");
            Box::new(Terminal)
        }
    }
}
