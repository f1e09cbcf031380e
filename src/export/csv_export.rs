use anyhow::Context;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::progress::services::GoalProgress;
use crate::sessions::repo_types::StudySession;

pub const SESSIONS_HEADER: [&str; 4] = ["Category", "Start Time", "End Time", "Duration (minutes)"];
pub const GOALS_HEADER: [&str; 4] = [
    "Category",
    "Target Minutes",
    "Achieved Minutes",
    "Remaining Minutes",
];

fn timestamp(at: OffsetDateTime) -> anyhow::Result<String> {
    at.format(&Rfc3339).context("format timestamp")
}

/// Closed sessions in the order given; open sessions are skipped.
pub fn sessions_csv(sessions: &[StudySession]) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(SESSIONS_HEADER)?;

    for s in sessions {
        let (Some(end), Some(minutes)) = (s.end_time, s.duration_in_minutes()) else {
            continue;
        };
        wtr.write_record([
            s.category_name.clone(),
            timestamp(s.start_time)?,
            timestamp(end)?,
            minutes.to_string(),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("flush sessions csv: {}", e.error()))
}

pub fn goals_csv(goals: &[GoalProgress]) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(GOALS_HEADER)?;

    for g in goals {
        wtr.write_record([
            g.category.clone(),
            g.target_minutes.to_string(),
            g.achieved_minutes.to_string(),
            g.remaining_minutes.to_string(),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("flush goals csv: {}", e.error()))
}
