//! Bordered single-line input used by the composer and the search box.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::input_state::TextInputState;

use super::styles;

/// Prompt symbol shown before the input text.
const PROMPT_SYMBOL: &str = "> ";

pub fn render_text_input(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    input: &TextInputState,
    focused: bool,
    placeholder: &str,
) {
    let border_style = if focused {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    let paragraph = Paragraph::new(build_input_line(input, focused, placeholder)).block(
        Block::default()
            .title(format!(" {title} "))
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);

    if focused {
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(PROMPT_SYMBOL.len() as u16)
            .saturating_add(cursor_column(input))
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position((cursor_x, area.y.saturating_add(1)));
    }
}

/// Display width of the text before the cursor; wide glyphs take two cells.
fn cursor_column(input: &TextInputState) -> u16 {
    let before: String = input.text().chars().take(input.cursor()).collect();
    before.width().min(u16::MAX as usize) as u16
}

fn build_input_line(input: &TextInputState, focused: bool, placeholder: &str) -> Line<'static> {
    let prompt = Span::styled(PROMPT_SYMBOL.to_owned(), styles::input_prompt_style());

    if input.is_empty() && !focused {
        return Line::from(vec![
            prompt,
            Span::styled(placeholder.to_owned(), styles::input_placeholder_style()),
        ]);
    }

    Line::from(vec![
        prompt,
        Span::styled(input.text().to_owned(), styles::input_text_style()),
    ])
}
