//! History rows and per-subject focus totals over completed sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Session;

const UNLABELLED_SUBJECT: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub subject: String,
    pub planned_min: u32,
    pub focused_min: u64,
    pub distractions: usize,
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectTotal {
    pub subject: String,
    pub focused_min: u64,
}

/// Whole minutes, rounding half up.
pub fn rounded_minutes(seconds: u64) -> u64 {
    (seconds + 30) / 60
}

/// `MM:SS`; minutes keep counting past 59.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// One row per completed session, in the order given.
pub fn history<'a, I>(sessions: I) -> Vec<HistoryRow>
where
    I: IntoIterator<Item = &'a Session>,
{
    sessions
        .into_iter()
        .filter(|s| s.completed)
        .map(|s| HistoryRow {
            session_id: s.id.clone(),
            created_at: s.created_at,
            title: s.title.clone(),
            subject: s.subject.clone(),
            planned_min: s.duration_min,
            focused_min: rounded_minutes(s.focused_seconds),
            distractions: s.distractions.len(),
            rating: s.reflection.as_ref().and_then(|r| r.rating),
        })
        .collect()
}

/// Focused minutes per subject over completed sessions, first-seen order.
/// Each session is rounded before summing.
pub fn subject_totals<'a, I>(sessions: I) -> Vec<SubjectTotal>
where
    I: IntoIterator<Item = &'a Session>,
{
    let mut totals: Vec<SubjectTotal> = Vec::new();
    for s in sessions.into_iter().filter(|s| s.completed) {
        let subject = match s.subject.trim() {
            "" => UNLABELLED_SUBJECT,
            subject => subject,
        };
        let minutes = rounded_minutes(s.focused_seconds);
        match totals.iter_mut().find(|t| t.subject == subject) {
            Some(total) => total.focused_min += minutes,
            None => totals.push(SubjectTotal {
                subject: subject.to_string(),
                focused_min: minutes,
            }),
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{NewSession, Reflection};
    use chrono::TimeZone;

    fn done(subject: &str, focused_seconds: u64, rating: Option<u8>) -> Session {
        let now = Utc.with_ymd_and_hms(2026, 7, 4, 9, 0, 0).unwrap();
        let mut s = Session::new(
            NewSession {
                title: format!("{subject} block"),
                subject: subject.into(),
                duration_min: 25,
                break_min: 5,
                tasks: vec![],
            },
            now,
            now.date_naive(),
        );
        s.completed = true;
        s.focused_seconds = focused_seconds;
        s.reflection = rating.map(|r| Reflection {
            rating: Some(r),
            went_well: String::new(),
            improve: String::new(),
        });
        s
    }

    #[test]
    fn clock_format_pads() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn minutes_round_half_up() {
        assert_eq!(rounded_minutes(29), 0);
        assert_eq!(rounded_minutes(30), 1);
        assert_eq!(rounded_minutes(1500), 25);
    }

    #[test]
    fn history_skips_open_sessions() {
        let mut open = done("Art", 100, None);
        open.completed = false;
        let sessions = vec![done("Maths", 1500, Some(4)), open];
        let rows = history(&sessions);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].focused_min, 25);
        assert_eq!(rows[0].rating, Some(4));
        assert_eq!(rows[0].distractions, 0);
    }

    #[test]
    fn subject_totals_group_and_bucket_blank() {
        let sessions = vec![
            done("Maths", 600, None),
            done("", 300, None),
            done("Maths", 90, None),
        ];
        let totals = subject_totals(&sessions);
        assert_eq!(
            totals,
            vec![
                SubjectTotal { subject: "Maths".into(), focused_min: 12 },
                SubjectTotal { subject: "Other".into(), focused_min: 5 },
            ]
        );
    }
}
