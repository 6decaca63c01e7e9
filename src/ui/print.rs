//! Plain-text output of the one-shot CLI commands.
//!
//! Every function returns lines instead of writing, so the layout is
//! testable; the caller prints them.

use chrono::{DateTime, Local, Utc};

use crate::domain::{
    booking::Booking,
    calendar::{CalendarEvent, CalendarEventKind},
    catalog::Service,
    conversation::Conversation,
    message::Message,
    presence::{is_online, message_clock, presence_label, relative_time, PresenceStyle},
    review::Review,
    stats::ProviderStats,
    user::{SessionUser, UserSummary},
};

fn local_stamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string()
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|text| !text.trim().is_empty()).unwrap_or("-")
}

pub fn session_user_lines(user: &SessionUser) -> Vec<String> {
    vec![
        format!("{} ({})", user.display_name(), user.role.as_label()),
        format!("id:       {}", user.id),
        format!("email:    {}", or_dash(user.email.as_deref())),
        format!("phone:    {}", or_dash(user.phone.as_deref())),
        format!("business: {}", or_dash(user.business_name.as_deref())),
    ]
}

pub fn conversation_lines(
    rows: &[&Conversation],
    current_user_id: &str,
    now: DateTime<Utc>,
) -> Vec<String> {
    if rows.is_empty() {
        return vec!["No conversations.".to_owned()];
    }

    rows.iter()
        .map(|row| {
            let online = if is_online(row.user.last_active_at, now) {
                " *"
            } else {
                ""
            };
            let unread = if row.unread_count > 0 {
                format!(" [{}]", row.unread_count)
            } else {
                String::new()
            };
            let (when, preview) = match &row.last_message {
                Some(last) => {
                    let own = if last.sender_id.as_deref() == Some(current_user_id) {
                        "You: "
                    } else {
                        ""
                    };
                    (
                        relative_time(last.created_at, now),
                        format!("{own}{}", single_line(&last.content)),
                    )
                }
                None => (String::new(), "No messages yet".to_owned()),
            };

            format!(
                "{:<12} {:>10}  {}{}{}  {}",
                row.peer_id(),
                when,
                row.display_name(),
                unread,
                online,
                preview
            )
        })
        .collect()
}

pub fn thread_lines(
    peer: &UserSummary,
    messages: &[Message],
    current_user_id: &str,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        peer.display_name(),
        presence_label(peer.last_active_at, now, PresenceStyle::DateFallback)
    )];

    if messages.is_empty() {
        lines.push("No messages yet.".to_owned());
        return lines;
    }

    let mut prev_date = None;
    for message in messages {
        let date = message.created_at.with_timezone(&Local).date_naive();
        if prev_date != Some(date) {
            lines.push(format!("--- {} ---", date.format("%d/%m/%Y")));
            prev_date = Some(date);
        }

        let sender = if message.is_own(current_user_id) {
            "You"
        } else {
            peer.display_name()
        };
        lines.push(format!(
            "{} {}: {}",
            message_clock(message.created_at),
            sender,
            message.content
        ));
    }

    lines
}

pub fn booking_lines(bookings: &[Booking]) -> Vec<String> {
    if bookings.is_empty() {
        return vec!["No bookings.".to_owned()];
    }

    bookings
        .iter()
        .map(|booking| {
            let customer = booking
                .customer
                .as_ref()
                .map(|customer| customer.display_name())
                .unwrap_or("-");
            let service = booking
                .service
                .as_ref()
                .map(|service| service.name.as_str())
                .unwrap_or("-");
            let price = booking
                .total_price
                .map(format_price)
                .unwrap_or_else(|| "-".to_owned());

            format!(
                "{:<12} {:<10} {}  {}  {}  {}",
                booking.id,
                booking.status.as_label(),
                local_stamp(booking.start_time),
                customer,
                service,
                price
            )
        })
        .collect()
}

pub fn service_lines(services: &[Service]) -> Vec<String> {
    if services.is_empty() {
        return vec!["No services.".to_owned()];
    }

    services
        .iter()
        .map(|service| {
            format!(
                "{:<12} [{}] {}  {} min  {}{}",
                service.id,
                if service.is_active { "on " } else { "off" },
                service.name,
                service.duration_minutes,
                format_price(service.price),
                service
                    .category
                    .as_deref()
                    .map(|category| format!("  ({category})"))
                    .unwrap_or_default()
            )
        })
        .collect()
}

pub fn event_lines(events: &[CalendarEvent]) -> Vec<String> {
    if events.is_empty() {
        return vec!["No calendar events.".to_owned()];
    }

    events
        .iter()
        .map(|event| {
            let kind = match event.kind {
                CalendarEventKind::Booking => "booking",
                CalendarEventKind::Blocked => "blocked",
                CalendarEventKind::Other => "event",
            };
            format!(
                "{:<12} {:<8} {} -> {}  {}",
                event.id,
                kind,
                local_stamp(event.start),
                local_stamp(event.end),
                event.title
            )
        })
        .collect()
}

pub fn review_lines(reviews: &[Review]) -> Vec<String> {
    if reviews.is_empty() {
        return vec!["No reviews.".to_owned()];
    }

    let mut lines = Vec::new();
    for review in reviews {
        let customer = review
            .customer
            .as_ref()
            .map(|customer| customer.display_name())
            .unwrap_or("anonymous");
        lines.push(format!(
            "{:<12} {} {}  {}",
            review.id,
            review.stars(),
            customer,
            local_stamp(review.created_at)
        ));
        if let Some(comment) = review.comment.as_deref().filter(|text| !text.trim().is_empty()) {
            lines.push(format!("    {}", single_line(comment)));
        }
        if review.has_reply() {
            lines.push(format!("    reply: {}", or_dash(review.reply.as_deref())));
        }
    }

    lines
}

pub fn stats_lines(stats: &ProviderStats) -> Vec<String> {
    vec![
        format!("bookings:   {} total", stats.total_bookings),
        format!("            {} pending", stats.pending_bookings),
        format!("            {} completed", stats.completed_bookings),
        format!("revenue:    {}", format_price(stats.total_revenue)),
        format!(
            "rating:     {:.1} from {} reviews",
            stats.average_rating, stats.total_reviews
        ),
    ]
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
