//! GUI command handler.

use crate::error::Result;
use crate::ui::gui::app::{run_gui, AppOptions};

/// Launch the native GUI application.
///
/// # Returns
///
/// * `Ok(())` when the user closes the window
/// * `Err(ChatdeckError)` if settings cannot be loaded or the GUI fails to
///   initialize
pub fn gui_command(options: AppOptions) -> Result<()> {
    run_gui(options)
}
