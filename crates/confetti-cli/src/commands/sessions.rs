//! Session list rendering from a JSON schedule export.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use confetti_core::{group_by_start_time, section_headers, SessionDetails};
use serde::Serialize;

use super::CliEnv;

#[derive(Subcommand)]
pub enum SessionsAction {
    /// Group sessions by start time and print the sections
    Group {
        /// JSON file with an array of sessions, sorted by start time
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct SectionOutput<'a> {
    label: String,
    time: chrono::NaiveDateTime,
    sessions: &'a [SessionDetails],
}

pub fn run(action: SessionsAction, env: &CliEnv) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionsAction::Group { file, json } => group(&file, json, env),
    }
}

fn group(file: &Path, json: bool, env: &CliEnv) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {e}", file.display()))?;
    let sessions: Vec<SessionDetails> = serde_json::from_str(&content)?;
    for session in &sessions {
        session
            .validate()
            .map_err(|e| format!("session '{}': {e}", session.id))?;
    }
    tracing::debug!(count = sessions.len(), "loaded sessions");

    let groups = group_by_start_time(sessions);
    let headers = section_headers(&groups, &env.config.display);

    if json {
        let output: Vec<SectionOutput<'_>> = groups
            .iter()
            .zip(headers)
            .map(|(group, header)| SectionOutput {
                label: header.label,
                time: group.time,
                sessions: &group.sessions,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No sessions.");
        return Ok(());
    }

    for (group, header) in groups.iter().zip(headers) {
        println!("{}", header.label);
        for session in &group.sessions {
            let marker = if session.is_break() { " [break]" } else { "" };
            println!("  {}{marker}", session.title);
            let subtitle = session.speaker_location();
            if !subtitle.is_empty() {
                println!("    {subtitle}");
            }
        }
    }
    Ok(())
}
