use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    domain::events::{AppEvent, KeyInput},
    usecases::contracts::AppEventSource,
};

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Reads terminal input; a poll window without input becomes a `Tick`.
#[derive(Default)]
pub struct CrosstermEventSource;

impl AppEventSource for CrosstermEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        if !event::poll(EVENT_POLL_TIMEOUT)? {
            return Ok(Some(AppEvent::Tick));
        }

        match event::read()? {
            Event::Key(key) => Ok(map_key_event(key)),
            _ => Ok(None),
        }
    }
}

/// Translates a key press. Plain `q` is left to the dashboard so it can be
/// typed into text inputs; Ctrl+C always quits.
pub fn map_key_event(key: KeyEvent) -> Option<AppEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let name = match key.code {
        KeyCode::Char('c') if ctrl => return Some(AppEvent::QuitRequested),
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Enter => "enter".to_owned(),
        KeyCode::Esc => "esc".to_owned(),
        KeyCode::Up => "up".to_owned(),
        KeyCode::Down => "down".to_owned(),
        KeyCode::Left => "left".to_owned(),
        KeyCode::Right => "right".to_owned(),
        KeyCode::Home => "home".to_owned(),
        KeyCode::End => "end".to_owned(),
        KeyCode::Backspace => "backspace".to_owned(),
        KeyCode::Delete => "delete".to_owned(),
        KeyCode::Tab => "tab".to_owned(),
        _ => return None,
    };

    Some(AppEvent::InputKey(KeyInput::new(name, ctrl)))
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        Ok(self.queue.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn input(key: &str) -> Option<AppEvent> {
        Some(AppEvent::InputKey(KeyInput::new(key, false)))
    }

    #[test]
    fn ctrl_c_requests_quit() {
        assert_eq!(
            map_key_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(AppEvent::QuitRequested)
        );
    }

    #[test]
    fn plain_q_is_an_ordinary_key() {
        assert_eq!(map_key_event(press(KeyCode::Char('q'), KeyModifiers::NONE)), input("q"));
    }

    #[test]
    fn named_keys_use_lowercase_names() {
        assert_eq!(map_key_event(press(KeyCode::Enter, KeyModifiers::NONE)), input("enter"));
        assert_eq!(map_key_event(press(KeyCode::Esc, KeyModifiers::NONE)), input("esc"));
        assert_eq!(
            map_key_event(press(KeyCode::Backspace, KeyModifiers::NONE)),
            input("backspace")
        );
        assert_eq!(map_key_event(press(KeyCode::Tab, KeyModifiers::NONE)), input("tab"));
    }

    #[test]
    fn ctrl_flag_is_kept_for_other_chars() {
        assert_eq!(
            map_key_event(press(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(AppEvent::InputKey(KeyInput::new("u", true)))
        );
    }

    #[test]
    fn releases_and_unknown_keys_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };

        assert_eq!(map_key_event(release), None);
        assert_eq!(map_key_event(press(KeyCode::F(5), KeyModifiers::NONE)), None);
    }

    #[test]
    fn mock_source_replays_queue_then_ends() {
        let mut source = MockEventSource::from(vec![AppEvent::Tick]);

        assert_eq!(
            source.next_event().expect("mock read should succeed"),
            Some(AppEvent::Tick)
        );
        assert_eq!(source.next_event().expect("mock read should succeed"), None);
    }
}
