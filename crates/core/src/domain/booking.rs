use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "Birthday Party")]
    BirthdayParty,
    #[serde(rename = "Wedding")]
    Wedding,
    #[serde(rename = "Corporate Event")]
    CorporateEvent,
    #[serde(rename = "Private Party")]
    PrivateParty,
    #[serde(rename = "Speaking Engagement")]
    SpeakingEngagement,
    #[serde(rename = "Virtual Event")]
    VirtualEvent,
    #[serde(rename = "Other")]
    Other,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        Self::BirthdayParty,
        Self::Wedding,
        Self::CorporateEvent,
        Self::PrivateParty,
        Self::SpeakingEngagement,
        Self::VirtualEvent,
        Self::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::BirthdayParty => "Birthday Party",
            Self::Wedding => "Wedding",
            Self::CorporateEvent => "Corporate Event",
            Self::PrivateParty => "Private Party",
            Self::SpeakingEngagement => "Speaking Engagement",
            Self::VirtualEvent => "Virtual Event",
            Self::Other => "Other",
        }
    }
}

impl Default for EventType {
    fn default() -> Self {
        Self::BirthdayParty
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|event_type| event_type.label().to_ascii_lowercase() == normalized)
            .ok_or_else(|| DomainError::UnknownEventType(value.trim().to_string()))
    }
}

/// Raw booking-form values for one UI session.
///
/// Times and the event date stay as the strings the form produced. The quote
/// engine is responsible for interpreting them and degrades on malformed input
/// rather than rejecting the booking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInput {
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub event_type: EventType,
    pub guest_count: u32,
    pub event_date: String,
    pub start_time: String,
    pub end_time: String,
    pub venue_address: String,
    pub add_mics: bool,
    pub add_lights: bool,
    pub payment_handle: String,
}

impl Default for BookingInput {
    fn default() -> Self {
        Self {
            client_name: String::new(),
            email: String::new(),
            phone: String::new(),
            event_type: EventType::default(),
            guest_count: 50,
            event_date: String::new(),
            start_time: "19:00".to_string(),
            end_time: "23:00".to_string(),
            venue_address: String::new(),
            add_mics: false,
            add_lights: false,
            payment_handle: String::new(),
        }
    }
}

impl BookingInput {
    /// Names of required form fields that are still blank.
    pub fn missing_required_fields(&self) -> Vec<String> {
        let text_fields = [
            ("client_name", &self.client_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("venue_address", &self.venue_address),
            ("event_date", &self.event_date),
            ("start_time", &self.start_time),
            ("end_time", &self.end_time),
        ];

        let mut missing: Vec<String> = text_fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| (*name).to_string())
            .collect();

        if self.guest_count == 0 {
            missing.push("guest_count".to_string());
        }

        missing
    }

    /// Clears the form for the next booking. The payment handle survives.
    pub fn reset_for_next_booking(&mut self) {
        let payment_handle = std::mem::take(&mut self.payment_handle);
        *self = Self { payment_handle, ..Self::default() };
    }
}
