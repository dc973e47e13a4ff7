//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// Host screen styles
// =============================================================================

pub fn screen_list_style() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn selected_screen_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
}

pub fn panel_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// Launcher styles
// =============================================================================

/// The breathing pulse maps onto brightness: near the peak the chip lights
/// up, at rest it stays dim.
pub fn launcher_style(pulse_scale: f32) -> Style {
    if pulse_scale >= 1.025 {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Blue)
    }
}

pub fn badge_style(badge_scale: f32, opacity: f32) -> Style {
    if opacity < 0.5 {
        Style::default().fg(Color::DarkGray)
    } else if badge_scale >= 1.1 {
        Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red)
    }
}

// =============================================================================
// Modal styles
// =============================================================================

/// The linear opacity fade maps onto a brightness ramp.
pub fn modal_opacity_style(opacity: f32) -> Style {
    if opacity < 0.35 {
        Style::default().fg(Color::DarkGray)
    } else if opacity < 0.75 {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn user_sender_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

pub fn assistant_sender_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn message_time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn loading_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::ITALIC)
}

pub fn quick_action_style() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn selected_quick_action_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn composer_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn voice_indicator_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

pub fn status_hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
