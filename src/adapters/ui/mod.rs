pub mod banner;
pub mod progress;
pub mod tui;

use crate::shared::config::BuilderConfig;

/// Prints the welcome banner for the configured range and applies the theme
/// for all subsequent inquire prompts. Call once at startup, after config load.
pub fn init_ui(config: &BuilderConfig) {
    banner::print_welcome(config);
    tui::apply_theme();
}
