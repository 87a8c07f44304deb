//! Integration tests for the on-disk store.
//!
//! Sessions written through the controller must come back field-for-field
//! from a fresh process over the same database file.

use chrono::{Local, TimeZone};
use focusflow_core::storage::{persistence, SESSIONS_KEY};
use focusflow_core::{
    Database, FixedClock, FocusFlow, KeyValueStore, ManualScheduler, NewSession, Phase,
    ReflectionInput, Theme,
};

fn clock() -> FixedClock {
    FixedClock::new(Local.with_ymd_and_hms(2026, 10, 6, 14, 0, 0).unwrap())
}

fn open(path: &std::path::Path) -> FocusFlow {
    FocusFlow::new(
        Box::new(Database::open_at(path).unwrap()),
        Box::new(clock()),
        Box::new(ManualScheduler::new()),
    )
}

#[test]
fn collection_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focusflow.db");

    let before = {
        let mut app = open(&path);
        app.create_session(NewSession {
            title: "Untouched".into(),
            subject: "Art".into(),
            duration_min: 15,
            break_min: 0,
            tasks: vec![],
        });
        app.create_session(NewSession {
            title: "Worked".into(),
            subject: "Maths".into(),
            duration_min: 25,
            break_min: 5,
            tasks: vec!["proofs".into(), "exercises".into()],
        });
        app.start().unwrap();
        for _ in 0..120 {
            app.tick();
        }
        app.log_distraction("people").unwrap();
        app.end_early().unwrap();
        app.submit_reflection(ReflectionInput {
            rating: None,
            went_well: "finished proofs".into(),
            improve: String::new(),
        })
        .unwrap();
        app.set_theme(Theme::Dark);
        app.sessions().to_vec()
    };

    let app = open(&path);
    assert_eq!(app.sessions(), before.as_slice());
    assert!(app.sessions()[0].distractions.is_empty());
    assert!(app.sessions()[0].reflection.is_none());
    assert_eq!(app.sessions()[1].focused_seconds, 120);
    assert_eq!(app.theme(), Theme::Dark);
    // Rebound to the latest session of the day, idle.
    assert_eq!(app.active().map(|s| s.title.as_str()), Some("Worked"));
    assert_eq!(app.timer().phase, Phase::Idle);
}

#[test]
fn corrupt_blob_starts_empty_and_is_overwritten_on_next_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focusflow.db");
    {
        let mut db = Database::open_at(&path).unwrap();
        db.set(SESSIONS_KEY, "not json at all").unwrap();
    }

    let mut app = open(&path);
    assert!(app.sessions().is_empty());
    app.create_session(NewSession {
        title: "Fresh".into(),
        subject: "Music".into(),
        duration_min: 20,
        break_min: 5,
        tasks: vec![],
    });

    let db = Database::open_at(&path).unwrap();
    let stored = persistence::load_sessions(&db).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Fresh");
}

#[test]
fn stored_json_uses_documented_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focusflow.db");
    {
        let mut app = open(&path);
        app.create_session(NewSession {
            title: "Shape".into(),
            subject: "Design".into(),
            duration_min: 25,
            break_min: 5,
            tasks: vec![],
        });
    }
    let db = Database::open_at(&path).unwrap();
    let raw = db.get(SESSIONS_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &json.as_array().unwrap()[0];
    assert_eq!(first["durationMin"], 25);
    assert_eq!(first["breakMin"], 5);
    assert_eq!(first["focusedSeconds"], 0);
    assert_eq!(first["completed"], false);
    assert_eq!(first["dateKey"], "2026-10-06");
    assert!(first["distractions"].as_array().unwrap().is_empty());
    assert!(first["reflection"].is_null());
}
