//! Forest palette and semantic styles for the console.

use canopy_core::{NotificationLevel, Severity};
use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const FERN: Color = Color::Rgb(120, 220, 140); // #78dc8c
pub const LICHEN: Color = Color::Rgb(150, 230, 210); // #96e6d2
pub const AMBER: Color = Color::Rgb(245, 200, 100); // #f5c864
pub const EMBER: Color = Color::Rgb(250, 110, 90); // #fa6e5a
pub const BARK: Color = Color::Rgb(190, 150, 110); // #be966e

// ── Extended Palette ──────────────────────────────────────────────────

pub const MIST: Color = Color::Rgb(200, 206, 200); // #c8cec8
pub const STONE: Color = Color::Rgb(105, 122, 110); // #697a6e
pub const BG_HIGHLIGHT: Color = Color::Rgb(34, 48, 40); // #223028
pub const BG_DARK: Color = Color::Rgb(20, 28, 24); // #141c18

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(LICHEN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(FERN)
}

pub fn border_default() -> Style {
    Style::default().fg(STONE)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(LICHEN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(MIST)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(FERN)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default().fg(FERN).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(MIST)
}

pub fn key_hint() -> Style {
    Style::default().fg(STONE)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(LICHEN).add_modifier(Modifier::BOLD)
}

pub fn error_text() -> Style {
    Style::default().fg(EMBER)
}

/// Cell colour for a record's status column.
pub fn severity(severity: Severity) -> Style {
    match severity {
        Severity::Critical => Style::default().fg(EMBER).add_modifier(Modifier::BOLD),
        Severity::Warning => Style::default().fg(AMBER),
        Severity::Good => Style::default().fg(FERN),
        Severity::Neutral => table_row(),
    }
}

/// Border colour and icon for a toast.
pub fn notification(level: NotificationLevel) -> (Color, &'static str) {
    match level {
        NotificationLevel::Success => (FERN, "✓"),
        NotificationLevel::Error => (EMBER, "✗"),
        NotificationLevel::Info => (LICHEN, "·"),
    }
}
