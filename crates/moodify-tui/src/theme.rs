//! Color palette and style constants for the moodify TUI.

use ratatui::style::{Color, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(18, 18, 18);
pub const C_ACCENT: Color = Color::Rgb(255, 95, 95);
pub const C_FAVORITE: Color = Color::Rgb(255, 210, 50);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SELECTION_BG: Color = Color::Rgb(28, 28, 40);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(120, 100, 200);
pub const C_NUMBER_HINT: Color = Color::Rgb(90, 90, 115);
pub const C_FILTER_BG: Color = Color::Rgb(20, 20, 32);
pub const C_FILTER_FG: Color = Color::Rgb(255, 200, 80);
pub const C_ARTIST: Color = Color::Rgb(100, 160, 130);
pub const C_ALBUM: Color = Color::Rgb(80, 140, 200);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 184, 80);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_BADGE_LIVE: Color = Color::Rgb(80, 200, 120);
pub const C_BADGE_ERR: Color = Color::Rgb(255, 95, 95);
pub const C_BADGE_PENDING: Color = Color::Rgb(255, 184, 80);
pub const C_MODE_NORMAL: Color = Color::Rgb(115, 115, 138);
pub const C_MODE_SEARCH: Color = Color::Rgb(255, 200, 80);
pub const C_MODE_EDIT: Color = Color::Rgb(255, 95, 95);

// ── Mood accents ──────────────────────────────────────────────────────────────

pub const C_MOOD_MUTLU: Color = Color::Rgb(255, 200, 80);
pub const C_MOOD_UZGUN: Color = Color::Rgb(90, 140, 230);
pub const C_MOOD_SAKIN: Color = Color::Rgb(80, 190, 170);
pub const C_MOOD_ENERJIK: Color = Color::Rgb(255, 110, 70);

/// Fold Turkish letters onto ASCII so "Üzgün" and "uzgun" pick the same
/// accent.
pub fn fold_route_key(key: &str) -> String {
    key.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'ç' => 'c',
            'ğ' => 'g',
            'ı' => 'i',
            'ö' => 'o',
            'ş' => 's',
            'ü' => 'u',
            other => other,
        })
        .collect()
}

/// Accent color for a mood, keyed by its route key.
pub fn mood_accent(route_key: &str) -> Color {
    match fold_route_key(route_key).as_str() {
        "mutlu" => C_MOOD_MUTLU,
        "uzgun" => C_MOOD_UZGUN,
        "sakin" => C_MOOD_SAKIN,
        "enerjik" => C_MOOD_ENERJIK,
        _ => C_PANEL_BORDER_FOCUSED,
    }
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}
