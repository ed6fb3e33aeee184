//! Grouping of sessions by start time for list rendering.
//!
//! The session list arrives sorted by start time. Screens show one section
//! per distinct start time; the first section header carries the weekday so
//! the day is visible at the top of the list, later headers only the time.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::model::SessionDetails;
use crate::storage::DisplayConfig;

/// Sessions sharing one start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionsAtTime {
    pub time: NaiveDateTime,
    pub sessions: Vec<SessionDetails>,
}

/// A rendered section header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHeader {
    pub time: NaiveDateTime,
    pub label: String,
}

/// Partition `sessions` into runs of identical start time.
///
/// Input order is kept as-is: groups come out in the order their first
/// session appears and sessions keep their relative order. The input is not
/// sorted here, so an unsorted list yields one group per adjacent run.
pub fn group_by_start_time<I>(sessions: I) -> Vec<SessionsAtTime>
where
    I: IntoIterator<Item = SessionDetails>,
{
    let mut groups: Vec<SessionsAtTime> = Vec::new();
    for session in sessions {
        match groups.last_mut() {
            Some(group) if group.time == session.start_time => group.sessions.push(session),
            _ => groups.push(SessionsAtTime {
                time: session.start_time,
                sessions: vec![session],
            }),
        }
    }
    groups
}

/// Header labels for `groups`: the first uses the day pattern, the rest the
/// time pattern.
pub fn section_headers(groups: &[SessionsAtTime], display: &DisplayConfig) -> Vec<SectionHeader> {
    groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let pattern = if index == 0 {
                &display.day_pattern
            } else {
                &display.time_pattern
            };
            SectionHeader {
                time: group.time,
                label: format_time(group.time, pattern),
            }
        })
        .collect()
}

/// Format `time` with a strftime pattern.
///
/// A pattern that cannot render a local date-time (unknown specifiers, or
/// offset/zone fields such as `%z`) falls back to ISO output instead of
/// failing mid-render.
pub fn format_time(time: NaiveDateTime, pattern: &str) -> String {
    try_format(time, pattern).unwrap_or_else(|| {
        tracing::warn!(pattern, "invalid time pattern, using ISO format");
        time.format(ISO_FALLBACK).to_string()
    })
}

/// Whether `pattern` can render a local date-time.
pub fn is_valid_pattern(pattern: &str) -> bool {
    let sample = NaiveDate::from_ymd_opt(2023, 1, 2).and_then(|d| d.and_hms_opt(9, 0, 0));
    sample.is_some_and(|time| try_format(time, pattern).is_some())
}

const ISO_FALLBACK: &str = "%Y-%m-%dT%H:%M";

fn try_format(time: NaiveDateTime, pattern: &str) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut out = String::new();
    write!(out, "{}", time.format_with_items(items.iter())).ok()?;
    Some(out)
}
