//! Human-readable notification text.
//!
//! Pure rendering: no I/O, no clock, no randomness. Missing payload fields
//! degrade to generic phrasing instead of failing, so a malformed producer
//! can never block delivery.

use serde_json::Value;

use staylink_core::events::EventType;

/// Rendered title and body for one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationText {
    /// Short title, suitable for a push headline.
    pub title: String,
    /// Body text.
    pub body: String,
}

/// Render the title and body for an event.
pub fn build(event_type: EventType, payload: Option<&Value>) -> NotificationText {
    let (title, body) = match event_type {
        EventType::NewMessage => (
            "New message".to_string(),
            match str_field(payload, "senderName") {
                Some(sender) => format!("{sender} sent you a message"),
                None => "You have a new message".to_string(),
            },
        ),
        EventType::BookingRequested => (
            "Booking request".to_string(),
            match (
                str_field(payload, "guestName"),
                str_field(payload, "listingTitle"),
            ) {
                (Some(guest), Some(listing)) => {
                    format!("{guest} requested to book {listing}")
                }
                (Some(guest), None) => format!("{guest} sent you a booking request"),
                _ => "You have a new booking request".to_string(),
            },
        ),
        EventType::BookingConfirmed => (
            "Booking confirmed".to_string(),
            match str_field(payload, "listingTitle") {
                Some(listing) => format!("Your booking at {listing} was confirmed"),
                None => "Your booking was confirmed".to_string(),
            },
        ),
        EventType::BookingCancelled => (
            "Booking cancelled".to_string(),
            match str_field(payload, "listingTitle") {
                Some(listing) => format!("Your booking at {listing} was cancelled"),
                None => "A booking was cancelled".to_string(),
            },
        ),
        EventType::NewReview => (
            "New review".to_string(),
            match (
                str_field(payload, "reviewerName"),
                str_field(payload, "listingTitle"),
            ) {
                (Some(reviewer), Some(listing)) => {
                    format!("{reviewer} left a review on {listing}")
                }
                (Some(reviewer), None) => format!("{reviewer} left you a review"),
                _ => "You received a new review".to_string(),
            },
        ),
        EventType::Unknown => (
            "Notification".to_string(),
            "You have a new notification".to_string(),
        ),
    };
    NotificationText { title, body }
}

fn str_field<'a>(payload: Option<&'a Value>, key: &str) -> Option<&'a str> {
    payload
        .and_then(|p| p.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
