use chrono::{DateTime, Utc};

use crate::domain::calendar::{BlockTimeRequest, CalendarEvent, TimeRange};

use super::contracts::RemoteError;

pub trait CalendarSource {
    fn list_events(&self, range: Option<TimeRange>) -> Result<Vec<CalendarEvent>, RemoteError>;
    fn block_time(&self, request: &BlockTimeRequest) -> Result<(), RemoteError>;
    fn unblock_time(&self, block_id: &str) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("start must be before end")]
    InvalidRange,
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Lists events, optionally limited to `[start, end)`. A one-sided range is
/// not sent.
pub fn list_events(
    source: &dyn CalendarSource,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<Vec<CalendarEvent>, CalendarError> {
    let range = match (start, end) {
        (Some(start), Some(end)) => Some(TimeRange::new(start, end).ok_or(CalendarError::InvalidRange)?),
        _ => None,
    };

    let mut events = source.list_events(range)?;
    events.sort_by_key(|event| event.start);
    Ok(events)
}

pub fn block_time(
    source: &dyn CalendarSource,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    reason: Option<String>,
) -> Result<(), CalendarError> {
    let range = TimeRange::new(start, end).ok_or(CalendarError::InvalidRange)?;

    Ok(source.block_time(&BlockTimeRequest::new(range, reason))?)
}

pub fn unblock_time(source: &dyn CalendarSource, block_id: &str) -> Result<(), CalendarError> {
    Ok(source.unblock_time(block_id)?)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::domain::calendar::CalendarEventKind;

    #[derive(Default)]
    struct StubSource {
        events: Vec<CalendarEvent>,
        seen_range: RefCell<Option<Option<TimeRange>>>,
        blocks: RefCell<Vec<BlockTimeRequest>>,
    }

    impl CalendarSource for StubSource {
        fn list_events(&self, range: Option<TimeRange>) -> Result<Vec<CalendarEvent>, RemoteError> {
            *self.seen_range.borrow_mut() = Some(range);
            Ok(self.events.clone())
        }

        fn block_time(&self, request: &BlockTimeRequest) -> Result<(), RemoteError> {
            self.blocks.borrow_mut().push(request.clone());
            Ok(())
        }

        fn unblock_time(&self, _block_id: &str) -> Result<(), RemoteError> {
            Ok(())
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, hour, 0, 0)
            .single()
            .expect("fixed timestamp should be valid")
    }

    fn event(id: &str, hour: u32) -> CalendarEvent {
        CalendarEvent {
            id: id.to_owned(),
            title: id.to_owned(),
            start: at(hour),
            end: at(hour) + Duration::hours(1),
            kind: CalendarEventKind::Booking,
        }
    }

    #[test]
    fn events_are_sorted_by_start() {
        let source = StubSource {
            events: vec![event("late", 15), event("early", 9)],
            ..StubSource::default()
        };

        let events = list_events(&source, None, None).expect("list should succeed");

        assert_eq!(events[0].id, "early");
        assert_eq!(*source.seen_range.borrow(), Some(None));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let source = StubSource::default();

        assert_eq!(
            list_events(&source, Some(at(12)), Some(at(9))),
            Err(CalendarError::InvalidRange)
        );
        assert_eq!(
            block_time(&source, at(12), at(12), None),
            Err(CalendarError::InvalidRange)
        );
        assert!(source.blocks.borrow().is_empty());
    }

    #[test]
    fn block_sends_range_and_reason() {
        let source = StubSource::default();

        block_time(&source, at(12), at(13), Some("lunch".to_owned())).expect("block should succeed");

        let blocks = source.blocks.borrow();
        assert_eq!(blocks[0].start, at(12));
        assert_eq!(blocks[0].reason.as_deref(), Some("lunch"));
    }
}
