use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{new_id, Displayable, Identifiable};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Academic,
    Holiday,
    Administrative,
    Event,
}

impl EventCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "academic" => Some(EventCategory::Academic),
            "holiday" => Some(EventCategory::Holiday),
            "administrative" => Some(EventCategory::Administrative),
            "event" => Some(EventCategory::Event),
            _ => None,
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventCategory::Academic => "academic",
            EventCategory::Holiday => "holiday",
            EventCategory::Administrative => "administrative",
            EventCategory::Event => "event",
        };
        f.write_str(label)
    }
}

/// Entry in the school agenda. `start` and `end` are instants, persisted as RFC 3339.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub category: EventCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl CalendarEvent {
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: EventCategory,
    ) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            description: None,
            start,
            end,
            category,
            location: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn has_valid_range(&self) -> bool {
        self.end >= self.start
    }
}

impl Identifiable for CalendarEvent {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for CalendarEvent {
    fn display_label(&self) -> String {
        format!("{} [{}]", self.title, self.category)
    }
}

/// Explicit field-level update for an agenda entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub category: Option<EventCategory>,
    pub location: Option<Option<String>>,
}

impl EventPatch {
    pub fn apply_to(self, event: &mut CalendarEvent) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(end) = self.end {
            event.end = end;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn instants_round_trip_through_json() {
        let start = Utc.with_ymd_and_hms(2024, 10, 4, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 10, 4, 18, 0, 0).unwrap();
        let event = CalendarEvent::new("Dia da Paz", start, end, EventCategory::Holiday);
        let json = serde_json::to_string(&event).unwrap();
        let parsed: CalendarEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.start, start);
        assert_eq!(parsed.end, end);
        assert_eq!(parsed, event);
    }

    #[test]
    fn patch_can_clear_location() {
        let start = Utc.with_ymd_and_hms(2024, 11, 5, 14, 0, 0).unwrap();
        let mut event =
            CalendarEvent::new("Reunião de Pais", start, start, EventCategory::Administrative)
                .with_location("Auditório Principal");
        EventPatch {
            location: Some(None),
            ..EventPatch::default()
        }
        .apply_to(&mut event);
        assert_eq!(event.location, None);
        assert_eq!(event.title, "Reunião de Pais");
    }
}
