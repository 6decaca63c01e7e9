//! Message thread rendering logic.
//!
//! Handles visual formatting of messages including:
//! - Sender grouping (consecutive messages from the same side show the label once)
//! - Date separators between messages from different local days
//! - Attachment placeholders highlighted like media indicators

use chrono::{Local, NaiveDate};
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::ListItem,
};

use crate::domain::{
    message::Message,
    presence::{local_date, message_clock},
};

use super::styles;

/// Sender label of the signed-in account.
const OWN_SENDER_LABEL: &str = "You";

/// A visual row group in the thread panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageListElement {
    DateSeparator(String),
    Message {
        time: String,
        /// Set on the first message of a run from the same sender.
        sender: Option<String>,
        own: bool,
        content: String,
    },
}

/// Builds the visual elements for `messages`, which are already in server
/// order. Own messages are those sent by `current_user_id`.
pub fn build_message_list_elements(
    messages: &[Message],
    current_user_id: &str,
    peer_name: &str,
) -> Vec<MessageListElement> {
    let mut elements = Vec::new();
    let mut prev_date: Option<NaiveDate> = None;
    let mut prev_own: Option<bool> = None;

    for message in messages {
        let date = message.created_at.with_timezone(&Local).date_naive();
        if prev_date != Some(date) {
            elements.push(MessageListElement::DateSeparator(local_date(message.created_at)));
            prev_own = None;
        }

        let own = message.is_own(current_user_id);
        let sender = (prev_own != Some(own)).then(|| {
            if own {
                OWN_SENDER_LABEL.to_owned()
            } else {
                peer_name.to_owned()
            }
        });

        elements.push(MessageListElement::Message {
            time: message_clock(message.created_at),
            sender,
            own,
            content: message.content.clone(),
        });

        prev_date = Some(date);
        prev_own = Some(own);
    }

    elements
}

/// Maps a message index to its row in the element list, skipping
/// separators.
pub fn message_index_to_element_index(
    elements: &[MessageListElement],
    message_index: usize,
) -> Option<usize> {
    elements
        .iter()
        .enumerate()
        .filter(|(_, element)| matches!(element, MessageListElement::Message { .. }))
        .nth(message_index)
        .map(|(element_index, _)| element_index)
}

pub fn element_to_list_item(element: &MessageListElement) -> ListItem<'static> {
    match element {
        MessageListElement::DateSeparator(date) => date_separator_item(date),
        MessageListElement::Message {
            time,
            sender,
            own,
            content,
        } => message_item(time, sender.as_deref(), *own, content),
    }
}

fn date_separator_item(date: &str) -> ListItem<'static> {
    let line = Line::from(vec![Span::styled(
        format!("--- {date} ---"),
        styles::date_separator_style(),
    )])
    .alignment(Alignment::Center);
    ListItem::new(vec![Line::default(), line])
}

fn message_item(time: &str, sender: Option<&str>, own: bool, content: &str) -> ListItem<'static> {
    let indent = "      ";
    let mut lines = Vec::new();

    if let Some(name) = sender {
        let sender_style = if own {
            styles::own_sender_style()
        } else {
            styles::peer_sender_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{time:>5} "), styles::message_time_style()),
            Span::styled(format!("{name}:"), sender_style),
        ]));
        for text_line in content_lines(content) {
            let mut spans = vec![Span::raw(indent.to_owned())];
            spans.extend(content_spans(text_line));
            lines.push(Line::from(spans));
        }
    } else {
        let mut rows = content_lines(content).into_iter();
        let mut first = vec![Span::styled(
            format!("{time:>5} "),
            styles::message_time_style(),
        )];
        first.extend(rows.next().map(content_spans).unwrap_or_default());
        lines.push(Line::from(first));

        for text_line in rows {
            let mut spans = vec![Span::raw(indent.to_owned())];
            spans.extend(content_spans(text_line));
            lines.push(Line::from(spans));
        }
    }

    ListItem::new(lines)
}

fn content_lines(content: &str) -> Vec<&str> {
    if content.is_empty() {
        vec![""]
    } else {
        content.lines().collect()
    }
}

/// Highlights a leading `[Tag]` the way attachment placeholders look.
fn content_spans(text: &str) -> Vec<Span<'static>> {
    if text.is_empty() {
        return vec![Span::styled(
            "[Empty message]".to_owned(),
            styles::attachment_style(),
        )];
    }

    if let Some(end) = text.strip_prefix('[').and_then(|_| text.find(']')) {
        let tag = &text[..=end];
        let rest = text[end + 1..].trim_start();
        let mut spans = vec![Span::styled(tag.to_owned(), styles::attachment_style())];
        if !rest.is_empty() {
            spans.push(Span::raw(" ".to_owned()));
            spans.push(Span::styled(rest.to_owned(), styles::message_text_style()));
        }
        return spans;
    }

    vec![Span::styled(text.to_owned(), styles::message_text_style())]
}
