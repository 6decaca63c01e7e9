use crate::domain::booking::{is_valid_rating, Booking, BookingAction, BookingStatus};

use super::contracts::RemoteError;

pub trait BookingsSource {
    fn list_bookings(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, RemoteError>;
    fn transition_booking(
        &self,
        booking_id: &str,
        action: BookingAction,
        reason: Option<&str>,
    ) -> Result<(), RemoteError>;
    fn rate_customer(
        &self,
        booking_id: &str,
        rating: u8,
        comment: Option<&str>,
    ) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("booking {0} not found")]
    NotFound(String),
    #[error("cannot {action} a booking that is {status}")]
    InvalidTransition {
        status: BookingStatus,
        action: &'static str,
    },
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
    #[error("customers can only be rated on completed bookings (booking is {0})")]
    NotCompleted(BookingStatus),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub fn list_bookings(
    source: &dyn BookingsSource,
    status: Option<BookingStatus>,
) -> Result<Vec<Booking>, BookingError> {
    Ok(source.list_bookings(status)?)
}

pub fn find_booking(source: &dyn BookingsSource, booking_id: &str) -> Result<Booking, BookingError> {
    source
        .list_bookings(None)?
        .into_iter()
        .find(|booking| booking.id == booking_id)
        .ok_or_else(|| BookingError::NotFound(booking_id.to_owned()))
}

/// Applies `action` after checking it is allowed from the booking's status.
/// A blank reason is not sent.
pub fn transition_booking(
    source: &dyn BookingsSource,
    booking: &Booking,
    action: BookingAction,
    reason: Option<&str>,
) -> Result<(), BookingError> {
    if !booking.status.allows(action) {
        return Err(BookingError::InvalidTransition {
            status: booking.status,
            action: action.path_segment(),
        });
    }

    let reason = match action {
        BookingAction::Reject => reason.map(str::trim).filter(|reason| !reason.is_empty()),
        _ => None,
    };

    source.transition_booking(&booking.id, action, reason)?;
    tracing::info!(booking_id = %booking.id, action = action.path_segment(), "booking transitioned");
    Ok(())
}

pub fn rate_customer(
    source: &dyn BookingsSource,
    booking: &Booking,
    rating: u8,
    comment: Option<&str>,
) -> Result<(), BookingError> {
    if !is_valid_rating(rating) {
        return Err(BookingError::InvalidRating(rating));
    }
    if booking.status != BookingStatus::Completed {
        return Err(BookingError::NotCompleted(booking.status));
    }

    let comment = comment.map(str::trim).filter(|comment| !comment.is_empty());
    Ok(source.rate_customer(&booking.id, rating, comment)?)
}
