//! Domain notification events.
//!
//! Producers (chat, bookings, reviews) push [`NotificationEvent`] values onto
//! a single typed queue; the dispatcher in `staylink-realtime` consumes the
//! queue and picks exactly one delivery channel per recipient.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserId;

/// The kind of domain event being delivered.
///
/// Unknown kinds deserialize into [`EventType::Unknown`] so that new
/// producers never break delivery of events the consumer predates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A new chat message arrived while the recipient was away.
    NewMessage,
    /// A guest requested a booking on the recipient's listing.
    BookingRequested,
    /// A booking was confirmed by the host.
    BookingConfirmed,
    /// A booking was cancelled.
    BookingCancelled,
    /// A new review was left on the recipient's listing.
    NewReview,
    /// Any event type this build does not recognize.
    #[serde(other)]
    Unknown,
}

impl EventType {
    /// Wire name of the event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewMessage => "NEW_MESSAGE",
            Self::BookingRequested => "BOOKING_REQUESTED",
            Self::BookingConfirmed => "BOOKING_CONFIRMED",
            Self::BookingCancelled => "BOOKING_CANCELLED",
            Self::NewReview => "NEW_REVIEW",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// One domain event addressed to one recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// The user the event is addressed to.
    pub recipient: UserId,
    /// What happened.
    pub event_type: EventType,
    /// Identifier of the booking/review/conversation the event refers to.
    pub reference_id: Option<Uuid>,
    /// Structured payload used to render the human-readable text.
    pub payload: Option<serde_json::Value>,
}

impl NotificationEvent {
    /// Create an event without payload or reference.
    pub fn new(recipient: UserId, event_type: EventType) -> Self {
        Self {
            recipient,
            event_type,
            reference_id: None,
            payload: None,
        }
    }

    /// Attach a reference id.
    pub fn with_reference(mut self, reference_id: Uuid) -> Self {
        self.reference_id = Some(reference_id);
        self
    }

    /// Attach a structured payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_event_types_deserialize_to_fallback() {
        let parsed: EventType = serde_json::from_str("\"LISTING_FEATURED\"").unwrap();
        assert_eq!(parsed, EventType::Unknown);
    }

    #[test]
    fn known_event_types_roundtrip() {
        let json = serde_json::to_string(&EventType::BookingConfirmed).unwrap();
        assert_eq!(json, "\"BOOKING_CONFIRMED\"");
        let parsed: EventType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, EventType::BookingConfirmed);
    }
}
