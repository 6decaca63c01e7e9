//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// Panels
// =============================================================================

pub fn active_panel_border_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn inactive_panel_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Highlight of the cursor row in lists.
pub fn cursor_row_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
}

// =============================================================================
// Conversation list styles
// =============================================================================

/// Style for the peer's display name (bold, bright).
pub fn peer_name_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for the last-message preview (dimmed).
pub fn preview_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for the unread badge (green).
pub fn unread_count_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

pub fn online_indicator_style() -> Style {
    Style::default().fg(Color::Green)
}

/// Style for the recency column.
pub fn timestamp_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn separator_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// Thread styles
// =============================================================================

/// Sender label of messages written by the signed-in provider.
pub fn own_sender_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Sender label of messages written by the peer.
pub fn peer_sender_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn message_time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for bracketed indicators like `[Image]`.
pub fn attachment_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn date_separator_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// Input and status line
// =============================================================================

pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn notice_info_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn notice_error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
