//! Conference sessions and their display grouping.

pub mod grouping;
pub mod model;

pub use grouping::{
    format_time, group_by_start_time, is_valid_pattern, section_headers, SectionHeader,
    SessionsAtTime,
};
pub use model::{Room, SessionDetails, Speaker};
