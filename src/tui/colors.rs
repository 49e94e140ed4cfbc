//! Color palette for the TUI

use ratatui::style::Color;

/// Destructive actions (cull, delete)
pub const ACCENT_PRIMARY: Color = Color::Rgb(235, 100, 110);
/// Forward navigation and confirmations
pub const ACCENT_SECONDARY: Color = Color::Rgb(120, 200, 140);
/// Titles and focused elements
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(110, 170, 240);

pub const TEXT_PRIMARY: Color = Color::Rgb(225, 225, 230);
pub const TEXT_SECONDARY: Color = Color::Rgb(140, 140, 150);
/// Controls that cannot be used right now
pub const TEXT_DISABLED: Color = Color::Rgb(80, 80, 88);

pub const BG_DARK: Color = Color::Rgb(24, 24, 30);
pub const BORDER_COLOR: Color = Color::Rgb(70, 70, 85);
