use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Lifecycle of a session. `Open -> Closed`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Open,
    Closed,
}

/// Study session row joined with its category name.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct StudySession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: i64,
    pub category_name: String,
    pub start_time: OffsetDateTime,
    pub end_time: Option<OffsetDateTime>,
}

impl StudySession {
    pub fn state(&self) -> SessionState {
        match self.end_time {
            Some(_) => SessionState::Closed,
            None => SessionState::Open,
        }
    }

    /// Unrounded elapsed minutes; `None` while the session is open.
    pub fn elapsed_minutes(&self) -> Option<f64> {
        self.end_time
            .map(|end| (end - self.start_time).as_seconds_f64() / 60.0)
    }

    /// Elapsed minutes rounded to two decimals; `None` while open.
    pub fn duration_in_minutes(&self) -> Option<f64> {
        self.elapsed_minutes().map(round_minutes)
    }
}

pub fn round_minutes(minutes: f64) -> f64 {
    (minutes * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::Duration;

    fn session(end: Option<OffsetDateTime>) -> StudySession {
        StudySession {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category_id: 1,
            category_name: "Reading".into(),
            start_time: datetime!(2024-05-01 09:00 UTC),
            end_time: end,
        }
    }

    #[test]
    fn open_session_has_no_duration() {
        let s = session(None);
        assert_eq!(s.state(), SessionState::Open);
        assert_eq!(s.duration_in_minutes(), None);
        assert_eq!(s.elapsed_minutes(), None);
    }

    #[test]
    fn closed_session_duration_in_minutes() {
        let s = session(Some(datetime!(2024-05-01 10:30 UTC)));
        assert_eq!(s.state(), SessionState::Closed);
        assert_eq!(s.duration_in_minutes(), Some(90.0));
    }

    #[test]
    fn duration_is_rounded_to_two_decimals() {
        // 10 seconds = 0.1666.. minutes
        let start = datetime!(2024-05-01 09:00 UTC);
        let s = session(Some(start + Duration::seconds(10)));
        assert_eq!(s.duration_in_minutes(), Some(0.17));
        assert!((s.elapsed_minutes().unwrap() - 10.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn round_minutes_values() {
        assert_eq!(round_minutes(1.234), 1.23);
        assert_eq!(round_minutes(1.236), 1.24);
        assert_eq!(round_minutes(0.0), 0.0);
    }
}
