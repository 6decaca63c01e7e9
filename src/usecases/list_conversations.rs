use crate::domain::conversation::Conversation;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListConversationsQuery {
    /// Client-side display-name filter. `None` or blank keeps every row.
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConversationsOutput {
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationsSourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
}

pub trait ConversationsSource {
    fn list_conversations(&self) -> Result<Vec<Conversation>, ConversationsSourceError>;
}

impl<T> ConversationsSource for &T
where
    T: ConversationsSource + ?Sized,
{
    fn list_conversations(&self) -> Result<Vec<Conversation>, ConversationsSourceError> {
        (*self).list_conversations()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListConversationsError {
    Unauthorized,
    TemporarilyUnavailable,
    DataContractViolation,
}

/// Fetches the conversation list in server order. The order is never
/// changed here; filtering only drops rows.
pub fn list_conversations(
    source: &dyn ConversationsSource,
    query: ListConversationsQuery,
) -> Result<ListConversationsOutput, ListConversationsError> {
    let mut conversations = source.list_conversations().map_err(map_source_error)?;

    if let Some(term) = query.search.as_deref() {
        conversations.retain(|conversation| conversation.matches_search(term));
    }

    Ok(ListConversationsOutput { conversations })
}

fn map_source_error(error: ConversationsSourceError) -> ListConversationsError {
    match error {
        ConversationsSourceError::Unauthorized => ListConversationsError::Unauthorized,
        ConversationsSourceError::Unavailable => ListConversationsError::TemporarilyUnavailable,
        ConversationsSourceError::InvalidData => ListConversationsError::DataContractViolation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::conversation;

    struct StubSource {
        result: Result<Vec<Conversation>, ConversationsSourceError>,
        calls: std::sync::Mutex<usize>,
    }

    impl StubSource {
        fn with_result(result: Result<Vec<Conversation>, ConversationsSourceError>) -> Self {
            Self {
                result,
                calls: std::sync::Mutex::new(0),
            }
        }
    }

    impl ConversationsSource for StubSource {
        fn list_conversations(&self) -> Result<Vec<Conversation>, ConversationsSourceError> {
            *self.calls.lock().expect("calls lock") += 1;
            self.result.clone()
        }
    }

    #[test]
    fn keeps_server_order_without_search() {
        let rows = vec![
            conversation("2", "Mai", 0),
            conversation("1", "Lan", 2),
            conversation("3", "Hoa", 0),
        ];
        let source = StubSource::with_result(Ok(rows.clone()));

        let output = list_conversations(&source, ListConversationsQuery::default())
            .expect("list should succeed");

        assert_eq!(output.conversations, rows);
    }

    #[test]
    fn repeated_loads_without_mutation_are_identical() {
        let source = StubSource::with_result(Ok(vec![
            conversation("1", "Lan", 0),
            conversation("2", "Mai", 0),
        ]));

        let first = list_conversations(&source, ListConversationsQuery::default())
            .expect("first load should succeed");
        let second = list_conversations(&source, ListConversationsQuery::default())
            .expect("second load should succeed");

        assert_eq!(first, second);
        assert_eq!(*source.calls.lock().expect("calls lock"), 2);
    }

    #[test]
    fn search_filters_by_display_name() {
        let source = StubSource::with_result(Ok(vec![
            conversation("1", "Lan Nguyen", 0),
            conversation("2", "Mai Tran", 0),
        ]));

        let output = list_conversations(
            &source,
            ListConversationsQuery {
                search: Some("NGUY".to_owned()),
            },
        )
        .expect("list should succeed");

        let ids: Vec<&str> = output.conversations.iter().map(|row| row.peer_id()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn blank_search_keeps_every_row() {
        let source = StubSource::with_result(Ok(vec![
            conversation("1", "Lan", 0),
            conversation("2", "Mai", 0),
        ]));

        let output = list_conversations(
            &source,
            ListConversationsQuery {
                search: Some("   ".to_owned()),
            },
        )
        .expect("list should succeed");

        assert_eq!(output.conversations.len(), 2);
    }

    #[test]
    fn maps_unauthorized_error() {
        let source = StubSource::with_result(Err(ConversationsSourceError::Unauthorized));

        let err = list_conversations(&source, ListConversationsQuery::default())
            .expect_err("must fail");

        assert_eq!(err, ListConversationsError::Unauthorized);
    }

    #[test]
    fn maps_unavailable_error_to_temporarily_unavailable() {
        let source = StubSource::with_result(Err(ConversationsSourceError::Unavailable));

        let err = list_conversations(&source, ListConversationsQuery::default())
            .expect_err("must fail");

        assert_eq!(err, ListConversationsError::TemporarilyUnavailable);
    }

    #[test]
    fn maps_invalid_data_error_to_contract_violation() {
        let source = StubSource::with_result(Err(ConversationsSourceError::InvalidData));

        let err = list_conversations(&source, ListConversationsQuery::default())
            .expect_err("must fail");

        assert_eq!(err, ListConversationsError::DataContractViolation);
    }
}
