//! Session record types and row helpers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const BREAK_TYPE: &str = "break";

/// A speaker attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub id: String,
    pub name: String,
}

/// The room a session takes place in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
}

/// A single scheduled session.
///
/// Times are conference-local: the schedule is published in the venue's
/// timezone and rendered as such on every device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetails {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub session_type: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub speakers: Vec<Speaker>,
    #[serde(default)]
    pub room: Option<Room>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SessionDetails {
    /// Create a session without a room, speakers or description.
    ///
    /// Does not check the time range; use [`try_new`](Self::try_new) for
    /// records coming from outside.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        session_type: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            session_type: session_type.into(),
            start_time,
            end_time,
            description: None,
            language: None,
            speakers: Vec::new(),
            room: None,
            tags: Vec::new(),
        }
    }

    /// Create a session, rejecting an end time before the start time.
    pub fn try_new(
        id: impl Into<String>,
        title: impl Into<String>,
        session_type: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        let session = Self::new(id, title, session_type, start_time, end_time);
        session.validate()?;
        Ok(session)
    }

    /// Check the time range. Zero-length sessions are allowed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end_time < self.start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }

    pub fn with_room(mut self, name: impl Into<String>) -> Self {
        self.room = Some(Room { name: name.into() });
        self
    }

    pub fn with_speaker(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.speakers.push(Speaker {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Breaks are shown in the list but cannot be opened.
    pub fn is_break(&self) -> bool {
        self.session_type.eq_ignore_ascii_case(BREAK_TYPE)
    }

    /// Subtitle line for a session row: `"Ann, Bob / Main Hall"`.
    ///
    /// Without speakers only the room is shown.
    pub fn speaker_location(&self) -> String {
        let mut text = String::new();
        if !self.speakers.is_empty() {
            let names: Vec<&str> = self.speakers.iter().map(|s| s.name.as_str()).collect();
            text.push_str(&names.join(", "));
            text.push_str(" / ");
        }
        if let Some(room) = &self.room {
            text.push_str(&room.name);
        }
        text
    }

    /// Whether the session is running at `now` (end exclusive).
    pub fn is_live(&self, now: NaiveDateTime) -> bool {
        self.start_time <= now && now < self.end_time
    }
}
