use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::{
    domain::{
        conversation::Conversation,
        conversation_list_state::ConversationListUiState,
        dashboard_state::{ActivePane, DashboardState},
        notice::NoticeLevel,
        presence::{is_online, presence_label, relative_time, PresenceStyle},
        thread_state::{ThreadState, ThreadUiState},
    },
    usecases::contracts::DashboardOrchestrator,
};

use super::message_rendering::{
    build_message_list_elements, element_to_list_item, message_index_to_element_index,
};
use super::styles;
use super::text_input::render_text_input;

const SEARCH_PLACEHOLDER: &str = "Press / to search by name";
const COMPOSER_PLACEHOLDER: &str = "Press i to write, /attach <path> to share a file";

/// Width reserved for the recency label of a conversation row.
const TIMESTAMP_WIDTH: usize = 10;

pub fn render(frame: &mut Frame<'_>, dashboard: &mut dyn DashboardOrchestrator, now: DateTime<Utc>) {
    let [content_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());

    let [left_area, right_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .areas(content_area);

    // 3 rows per input: border, text, border
    let [search_area, list_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .areas(left_area);

    let [thread_area, composer_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .areas(right_area);

    let active_pane = dashboard.state().active_pane();

    render_text_input(
        frame,
        search_area,
        "Search",
        dashboard.state().search(),
        active_pane == ActivePane::Search,
        SEARCH_PLACEHOLDER,
    );
    render_conversation_panel(frame, list_area, dashboard, active_pane, now);
    render_thread_panel(frame, thread_area, dashboard, active_pane, now);
    render_text_input(
        frame,
        composer_area,
        "Message",
        dashboard.state().composer(),
        active_pane == ActivePane::Composer,
        COMPOSER_PLACEHOLDER,
    );

    frame.render_widget(Paragraph::new(status_line(dashboard.state())), status_area);
}

fn border_style(active: bool) -> Style {
    if active {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    }
}

fn panel_block(title: String, active: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(active))
}

fn render_conversation_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    dashboard: &dyn DashboardOrchestrator,
    active_pane: ActivePane,
    now: DateTime<Utc>,
) {
    let is_active = active_pane == ActivePane::Conversations;
    let list = dashboard.conversations();

    let placeholder = match list.ui_state() {
        ConversationListUiState::Loading => Some("Loading conversations..."),
        ConversationListUiState::Empty => Some("No conversations yet. Press r to refresh."),
        ConversationListUiState::Error => {
            Some("Failed to load conversations. Press r to retry.")
        }
        ConversationListUiState::Ready => None,
    };
    if let Some(text) = placeholder {
        let panel = Paragraph::new(text).block(panel_block("Conversations".to_owned(), is_active));
        frame.render_widget(panel, area);
        return;
    }

    let visible = list.visible();
    let title = if list.search_term().trim().is_empty() {
        format!("Conversations ({})", visible.len())
    } else {
        format!(
            "Conversations ({}/{})",
            visible.len(),
            list.conversations().len()
        )
    };

    if visible.is_empty() {
        let panel = Paragraph::new("No conversation matches the search.")
            .block(panel_block(title, is_active));
        frame.render_widget(panel, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let current_user_id = dashboard.current_user_id();
    let items: Vec<ListItem<'static>> = visible
        .iter()
        .map(|row| ListItem::new(conversation_row_line(row, current_user_id, now, inner_width)))
        .collect();

    let widget = List::new(items)
        .block(panel_block(title, is_active))
        .highlight_style(styles::cursor_row_style());

    let mut list_state = ListState::default();
    list_state.select(list.cursor());
    frame.render_stateful_widget(widget, area, &mut list_state);
}

fn conversation_row_line(
    row: &Conversation,
    current_user_id: &str,
    now: DateTime<Utc>,
    width: usize,
) -> Line<'static> {
    let timestamp = row
        .last_message
        .as_ref()
        .map(|last| relative_time(last.created_at, now))
        .unwrap_or_default();

    let own_prefix = row
        .last_message
        .as_ref()
        .filter(|last| last.sender_id.as_deref() == Some(current_user_id))
        .map(|_| "You: ")
        .unwrap_or("");

    let raw_preview = row
        .last_message
        .as_ref()
        .map(|last| normalize_preview(&last.content))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| "No messages yet".to_owned());

    let unread_badge = if row.unread_count > 0 {
        format!(" [{}]", row.unread_count)
    } else {
        String::new()
    };
    let online_indicator = if is_online(row.user.last_active_at, now) {
        " \u{25CF}"
    } else {
        ""
    };

    let name = row.display_name().to_owned();
    let fixed_len = TIMESTAMP_WIDTH + 3 + name.chars().count() + 1 + own_prefix.len();
    let suffix_len = unread_badge.chars().count() + online_indicator.chars().count();
    let available = width.saturating_sub(fixed_len + suffix_len);

    let preview_chars: Vec<char> = raw_preview.chars().collect();
    let (preview, padding) = if preview_chars.len() <= available {
        let padding = available - preview_chars.len();
        (raw_preview, padding)
    } else {
        let truncated: String = preview_chars
            .iter()
            .take(available.saturating_sub(3))
            .collect();
        (format!("{truncated}..."), 0)
    };

    let mut spans = vec![
        Span::styled(
            format!("{timestamp:>width$}", width = TIMESTAMP_WIDTH),
            styles::timestamp_style(),
        ),
        Span::styled(" | ", styles::separator_style()),
        Span::styled(name, styles::peer_name_style()),
        Span::raw(" "),
    ];
    if !own_prefix.is_empty() {
        spans.push(Span::styled(own_prefix.to_owned(), styles::own_sender_style()));
    }
    spans.push(Span::styled(preview, styles::preview_style()));
    if padding > 0 {
        spans.push(Span::raw(" ".repeat(padding)));
    }
    if !unread_badge.is_empty() {
        spans.push(Span::styled(unread_badge, styles::unread_count_style()));
    }
    if !online_indicator.is_empty() {
        spans.push(Span::styled(
            online_indicator.to_owned(),
            styles::online_indicator_style(),
        ));
    }

    Line::from(spans)
}

fn normalize_preview(preview: &str) -> String {
    preview.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn render_thread_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    dashboard: &mut dyn DashboardOrchestrator,
    active_pane: ActivePane,
    now: DateTime<Utc>,
) {
    let is_active = active_pane == ActivePane::Thread;
    let title = thread_title(dashboard.thread(), now);

    let placeholder = match dashboard.thread().ui_state() {
        ThreadUiState::Empty => Some("Select a conversation to view messages"),
        ThreadUiState::Loading => Some("Loading messages..."),
        ThreadUiState::Error => Some("Failed to load messages. Press r to retry."),
        ThreadUiState::Ready if dashboard.thread().messages().is_empty() => {
            Some("No messages yet. Say hello!")
        }
        ThreadUiState::Ready => None,
    };
    if let Some(text) = placeholder {
        frame.render_widget(Paragraph::new(text).block(panel_block(title, is_active)), area);
        return;
    }

    let peer_name = dashboard
        .thread()
        .peer()
        .map(|peer| peer.display_name().to_owned())
        .unwrap_or_default();
    let elements = build_message_list_elements(
        dashboard.thread().messages(),
        dashboard.current_user_id(),
        &peer_name,
    );
    let items: Vec<ListItem<'static>> = elements.iter().map(element_to_list_item).collect();

    let viewport_height = area.height.saturating_sub(2) as usize;
    let element_index = dashboard
        .thread()
        .selected_index()
        .and_then(|index| message_index_to_element_index(&elements, index));
    if let Some(index) = element_index {
        dashboard
            .thread_mut()
            .update_scroll_offset(index, viewport_height);
    }

    let widget = List::new(items)
        .block(panel_block(title, is_active))
        .highlight_style(styles::cursor_row_style());

    let mut list_state = ListState::default();
    list_state.select(element_index);
    *list_state.offset_mut() = dashboard.thread().scroll_offset();
    frame.render_stateful_widget(widget, area, &mut list_state);
}

fn thread_title(thread: &ThreadState, now: DateTime<Utc>) -> String {
    let Some(peer) = thread.peer() else {
        return "Messages".to_owned();
    };

    let presence = presence_label(peer.last_active_at, now, PresenceStyle::Days);
    if thread.is_sending() {
        format!("{} ({presence}) sending...", peer.display_name())
    } else {
        format!("{} ({presence})", peer.display_name())
    }
}

fn status_line(state: &DashboardState) -> Line<'static> {
    if let Some(notice) = state.current_notice() {
        let style = match notice.level {
            NoticeLevel::Info => styles::notice_info_style(),
            NoticeLevel::Error => styles::notice_error_style(),
        };
        return Line::from(Span::styled(notice.text.clone(), style));
    }

    let hint = match state.active_pane() {
        ActivePane::Conversations => {
            "j/k: move | Enter: open | /: search | r: refresh | q: quit"
        }
        ActivePane::Thread => {
            "j/k: move | i: compose | m: mark read | x: close | Esc: back | q: quit"
        }
        ActivePane::Search => "type to filter | Enter: keep | Esc: clear",
        ActivePane::Composer => "Enter: send | Esc: cancel | /attach <path>: share a file",
    };
    Line::from(Span::styled(hint.to_owned(), styles::hint_style()))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::{
        domain::{
            conversation::MessageSummary,
            events::{AppEvent, KeyInput},
            notice::Notice,
        },
        test_support::{conversation, message, started_dashboard, FakeBackend},
    };

    fn line_to_string(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn with_last_message(mut row: Conversation, sender_id: &str, content: &str) -> Conversation {
        row.last_message = Some(MessageSummary {
            id: Some("m".to_owned()),
            sender_id: Some(sender_id.to_owned()),
            content: content.to_owned(),
            created_at: Utc::now() - Duration::minutes(5),
        });
        row
    }

    fn draw(dashboard: &mut dyn DashboardOrchestrator) -> String {
        let mut terminal =
            Terminal::new(TestBackend::new(100, 20)).expect("test terminal should build");
        terminal
            .draw(|frame| render(frame, dashboard, Utc::now()))
            .expect("draw should succeed");

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn press(dashboard: &mut dyn DashboardOrchestrator, key: &str) {
        dashboard
            .handle_event(AppEvent::InputKey(KeyInput::new(key, false)))
            .expect("key should be handled");
        dashboard
            .run_pending_work()
            .expect("queued work should run");
    }

    #[test]
    fn row_shows_time_name_preview_and_badge() {
        let row = with_last_message(conversation("1", "Lan", 3), "1", "see you\n at 3pm");

        let text = line_to_string(&conversation_row_line(&row, "me", Utc::now(), 60));

        assert!(text.contains("5 minutes | Lan"));
        assert!(text.contains("see you at 3pm"));
        assert!(text.trim_end().ends_with("[3]"));
    }

    #[test]
    fn row_prefixes_own_last_message() {
        let row = with_last_message(conversation("1", "Lan", 0), "me", "done");

        let text = line_to_string(&conversation_row_line(&row, "me", Utc::now(), 60));

        assert!(text.contains("Lan You: done"));
        assert!(!text.contains('['));
    }

    #[test]
    fn row_without_history_uses_placeholder() {
        let text = line_to_string(&conversation_row_line(
            &conversation("1", "Lan", 0),
            "me",
            Utc::now(),
            60,
        ));

        assert!(text.contains("No messages yet"));
    }

    #[test]
    fn online_peer_gets_indicator() {
        let mut row = conversation("1", "Lan", 0);
        row.user.last_active_at = Some(Utc::now() - Duration::seconds(30));

        let text = line_to_string(&conversation_row_line(&row, "me", Utc::now(), 60));

        assert!(text.ends_with('\u{25CF}'));
    }

    #[test]
    fn long_preview_is_truncated_to_width() {
        let row = with_last_message(conversation("1", "Lan", 0), "1", &"x".repeat(200));

        let text = line_to_string(&conversation_row_line(&row, "me", Utc::now(), 40));

        assert!(text.ends_with("..."));
        assert_eq!(text.chars().count(), 40);
    }

    #[test]
    fn thread_title_carries_presence() {
        let mut thread = ThreadState::default();
        assert_eq!(thread_title(&thread, Utc::now()), "Messages");

        let mut peer = conversation("1", "Lan", 0).user;
        peer.last_active_at = Some(Utc::now());
        thread.set_loading(peer);

        assert_eq!(thread_title(&thread, Utc::now()), "Lan (active now)");
    }

    #[test]
    fn status_line_prefers_notice_over_hints() {
        let mut state = DashboardState::default();
        assert!(line_to_string(&status_line(&state)).contains("Enter: open"));

        state.push_notice(Notice::error("message could not be sent", 3));

        assert_eq!(
            line_to_string(&status_line(&state)),
            "message could not be sent"
        );
    }

    #[test]
    fn dashboard_renders_list_and_open_thread() {
        let backend = FakeBackend::new(
            "me",
            vec![conversation("1", "Lan", 2), conversation("2", "Mai", 0)],
        )
        .with_thread("1", vec![message("a", "1", "hi from Lan")]);
        let mut dashboard = started_dashboard(backend);

        let screen = draw(&mut dashboard);
        assert!(screen.contains("Conversations (2)"));
        assert!(screen.contains("Select a conversation"));

        press(&mut dashboard, "enter");
        let screen = draw(&mut dashboard);

        assert!(screen.contains("Lan (offline)"));
        assert!(screen.contains("hi from Lan"));
    }

    #[test]
    fn search_filter_shows_match_count() {
        let backend = FakeBackend::new(
            "me",
            vec![conversation("1", "Lan", 0), conversation("2", "Mai", 0)],
        );
        let mut dashboard = started_dashboard(backend);

        press(&mut dashboard, "/");
        press(&mut dashboard, "m");
        let screen = draw(&mut dashboard);

        assert!(screen.contains("Conversations (1/2)"));
        assert!(screen.contains("Mai"));
        assert!(!screen.contains("Lan"));
    }
}
