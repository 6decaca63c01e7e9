use crate::domain::review::Review;

use super::contracts::RemoteError;

pub trait ReviewsSource {
    fn list_reviews(&self) -> Result<Vec<Review>, RemoteError>;
    fn reply_to_review(&self, review_id: &str, reply: &str) -> Result<(), RemoteError>;
    fn report_review(&self, review_id: &str, reason: &str) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("reply must not be blank")]
    EmptyReply,
    #[error("report reason must not be blank")]
    EmptyReason,
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub fn list_reviews(source: &dyn ReviewsSource) -> Result<Vec<Review>, ReviewError> {
    Ok(source.list_reviews()?)
}

pub fn reply_to_review(
    source: &dyn ReviewsSource,
    review_id: &str,
    reply: &str,
) -> Result<(), ReviewError> {
    let reply = reply.trim();
    if reply.is_empty() {
        return Err(ReviewError::EmptyReply);
    }

    Ok(source.reply_to_review(review_id, reply)?)
}

pub fn report_review(
    source: &dyn ReviewsSource,
    review_id: &str,
    reason: &str,
) -> Result<(), ReviewError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ReviewError::EmptyReason);
    }

    Ok(source.report_review(review_id, reason)?)
}
