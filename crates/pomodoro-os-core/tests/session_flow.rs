//! End-to-end session lifecycle tests against an in-memory store.

use chrono::{Duration, Local, TimeZone};
use pomodoro_os_core::notification::{LOG_DELETED, SESSION_COMPLETE};
use pomodoro_os_core::storage::StorageConfig;
use pomodoro_os_core::{
    Clock, Config, Event, KvStore, LogEntry, LogStore, ManualClock, ManualTicker, MemoryKv,
    SessionEngine, SessionKind, TokioTicker,
};

type Engine = SessionEngine<MemoryKv, ManualTicker, ManualClock>;

fn setup() -> (Engine, ManualClock) {
    let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 3, 10, 9, 15, 0).unwrap());
    let store = LogStore::with_clock(MemoryKv::new(), StorageConfig::default(), clock.clone());
    let engine = SessionEngine::new(store, ManualTicker::new(), &Config::default()).unwrap();
    (engine, clock)
}

fn run_for(engine: &mut Engine, clock: &ManualClock, secs: u64) -> Option<Event> {
    let mut last = None;
    for _ in 0..secs {
        clock.advance(Duration::seconds(1));
        if let Some(event) = engine.tick().unwrap() {
            last = Some(event);
        }
    }
    last
}

fn stored_logs(engine: &Engine) -> Vec<LogEntry> {
    let raw = engine.store().backend().get("pomodoroLogs").unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn pomodoro_finish_records_elapsed_time() {
    let (mut engine, clock) = setup();
    engine.select_project("Writing");
    engine.start();
    run_for(&mut engine, &clock, 1495);
    assert_eq!(engine.remaining(), 5);

    let event = engine.finish().unwrap().unwrap();
    let entry = event.committed_entry().unwrap().clone();
    assert_eq!(entry.duration_secs, 1495);
    assert_eq!(entry.kind, SessionKind::Pomodoro);
    assert_eq!(entry.project, "Writing");
    assert_eq!(entry.start_time, "09:15");
    assert_eq!(entry.date, "10/03/2024");
    assert_eq!(entry.timestamp, clock.now_ms());

    assert!(!engine.is_running());
    assert_eq!(engine.remaining(), 1500);
    assert!(engine.started_at().is_none());

    let raw = engine.store().backend().get("pomodoroLogs").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["duration"], "24:55");
    assert_eq!(json[0]["type"], "Pomodoro session");
    assert_eq!(stored_logs(&engine), vec![entry]);
}

#[test]
fn short_infinite_session_is_not_recorded() {
    let (mut engine, clock) = setup();
    engine.switch_mode(SessionKind::Infinite).unwrap();
    engine.start();
    run_for(&mut engine, &clock, 4);
    assert_eq!(engine.remaining(), 4);

    let event = engine.finish().unwrap().unwrap();
    assert!(matches!(event, Event::SessionDiscarded { elapsed_secs: 4, .. }));
    assert!(engine.logs().is_empty());
    assert!(stored_logs(&engine).is_empty());
    assert_eq!(engine.remaining(), 0);
    assert!(!engine.is_running());
}

#[test]
fn threshold_is_inclusive() {
    let (mut engine, clock) = setup();
    engine.switch_mode(SessionKind::Infinite).unwrap();

    engine.start();
    run_for(&mut engine, &clock, 9);
    assert!(engine.finish().unwrap().unwrap().committed_entry().is_none());

    engine.start();
    run_for(&mut engine, &clock, 10);
    let event = engine.finish().unwrap().unwrap();
    assert_eq!(event.committed_entry().unwrap().duration_secs, 10);
    assert_eq!(engine.logs().len(), 1);
}

#[test]
fn infinite_counts_up_without_bound() {
    let (mut engine, clock) = setup();
    engine.switch_mode(SessionKind::Infinite).unwrap();
    engine.start();
    assert!(run_for(&mut engine, &clock, 4000).is_none());
    assert_eq!(engine.remaining(), 4000);
    assert!(engine.is_running());
}

#[test]
fn countdown_auto_completes_exactly_once() {
    let (mut engine, clock) = setup();
    engine.start();
    let event = run_for(&mut engine, &clock, 1500).unwrap();
    assert_eq!(event.committed_entry().unwrap().duration_secs, 1500);
    assert!(!engine.is_running());

    assert!(run_for(&mut engine, &clock, 10).is_none());
    assert_eq!(engine.logs().len(), 1);
    assert_eq!(engine.remaining(), 1500);
}

#[test]
fn switching_mode_mid_session_commits_first() {
    let (mut engine, clock) = setup();
    engine.start();
    run_for(&mut engine, &clock, 100);

    let event = engine.switch_mode(SessionKind::Infinite).unwrap();
    match event {
        Event::ModeSwitched {
            from,
            to,
            committed: Some(entry),
            ..
        } => {
            assert_eq!(from, SessionKind::Pomodoro);
            assert_eq!(to, SessionKind::Infinite);
            assert_eq!(entry.kind, SessionKind::Pomodoro);
            assert_eq!(entry.duration_secs, 100);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(engine.logs().len(), 1);
    assert_eq!(engine.mode(), SessionKind::Infinite);
    assert_eq!(engine.remaining(), 0);
    assert!(!engine.is_running());
}

#[test]
fn tick_registration_is_cancelled_once_per_stop() {
    let (mut engine, clock) = setup();

    for _ in 0..3 {
        engine.start();
        run_for(&mut engine, &clock, 20);
        engine.finish().unwrap();
    }
    engine.start();
    engine.switch_mode(SessionKind::Infinite).unwrap();
    engine.switch_mode(SessionKind::Pomodoro).unwrap();
    engine.start();
    run_for(&mut engine, &clock, 1500);
    engine.finish().unwrap();

    assert_eq!(engine.ticker().scheduled_count(), 5);
    assert_eq!(engine.ticker().cancelled_count(), 5);
    assert!(engine.ticker().active().is_none());
}

#[test]
fn start_twice_does_not_move_the_anchor() {
    let (mut engine, clock) = setup();
    engine.start();
    let anchor = engine.started_at().unwrap();
    run_for(&mut engine, &clock, 120);
    assert!(engine.start().is_none());
    assert_eq!(engine.started_at(), Some(anchor));

    let event = engine.finish().unwrap().unwrap();
    assert_eq!(event.committed_entry().unwrap().start_time, "09:15");
}

#[test]
fn deleting_selected_project_falls_back() {
    let (mut engine, _) = setup();
    assert!(engine.select_project("Gaming"));

    let event = engine.delete_project(7).unwrap().unwrap();
    assert!(matches!(event, Event::ProjectDeleted { ref selected, .. } if selected.as_deref() == Some("Administrative")));
    assert_eq!(engine.selected_project(), Some("Administrative"));
    assert!(engine.projects().iter().all(|p| p.name != "Gaming"));
}

#[test]
fn deleting_other_project_keeps_selection() {
    let (mut engine, _) = setup();
    engine.select_project("Writing");
    engine.delete_project(1).unwrap();
    assert_eq!(engine.selected_project(), Some("Writing"));
    assert!(engine.delete_project(12345).unwrap().is_none());
    assert_eq!(engine.projects().len(), 6);
}

#[test]
fn deleting_every_project_clears_selection() {
    let (mut engine, clock) = setup();
    for id in 1..=7 {
        engine.delete_project(id).unwrap();
    }
    assert!(engine.projects().is_empty());
    assert_eq!(engine.selected_project(), None);

    engine.add_project("Reading", "Book").unwrap();
    assert_eq!(engine.selected_project(), Some("Reading"));

    clock.advance(Duration::seconds(1));
    assert!(engine.add_project("  ", "Folder").unwrap().is_none());
    assert_eq!(engine.projects().len(), 1);
}

#[test]
fn deleting_a_log_notifies_and_persists() {
    let (mut engine, clock) = setup();
    engine.start();
    run_for(&mut engine, &clock, 60);
    let entry = engine.finish().unwrap().unwrap().committed_entry().unwrap().clone();
    assert_eq!(
        engine.notification().map(|n| n.message.as_str()),
        Some(SESSION_COMPLETE)
    );

    assert!(engine.delete_log(entry.id + 1).unwrap().is_none());
    assert_eq!(engine.logs().len(), 1);

    let event = engine.delete_log(entry.id).unwrap().unwrap();
    assert!(matches!(event, Event::LogDeleted { .. }));
    assert!(engine.logs().is_empty());
    assert!(stored_logs(&engine).is_empty());
    assert_eq!(
        engine.notification().map(|n| n.message.as_str()),
        Some(LOG_DELETED)
    );
}

#[test]
fn commits_in_the_same_millisecond_get_distinct_ids() {
    let (mut engine, _) = setup();
    engine.switch_mode(SessionKind::Infinite).unwrap();
    for _ in 0..2 {
        engine.start();
        for _ in 0..15 {
            engine.tick().unwrap();
        }
        engine.finish().unwrap();
    }
    let logs = engine.logs();
    assert_eq!(logs.len(), 2);
    assert_ne!(logs[0].id, logs[1].id);
}

#[test]
fn reload_loses_running_session_but_keeps_log() {
    let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 3, 10, 9, 15, 0).unwrap());
    let store = LogStore::with_clock(MemoryKv::new(), StorageConfig::default(), clock.clone());
    let mut engine = SessionEngine::new(store, ManualTicker::new(), &Config::default()).unwrap();

    engine.start();
    run_for(&mut engine, &clock, 30);
    engine.finish().unwrap();
    engine.start();
    run_for(&mut engine, &clock, 30);

    let backend = engine.store().backend().clone();
    drop(engine);

    let store = LogStore::with_clock(backend, StorageConfig::default(), clock.clone());
    let engine = SessionEngine::new(store, ManualTicker::new(), &Config::default()).unwrap();
    assert!(!engine.is_running());
    assert_eq!(engine.remaining(), 1500);
    assert_eq!(engine.logs().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn tokio_ticks_drive_the_engine() {
    let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 3, 10, 9, 15, 0).unwrap());
    let store = LogStore::with_clock(MemoryKv::new(), StorageConfig::default(), clock.clone());
    let mut config = Config::default();
    config.timer.min_commit_secs = 3;

    let (ticker, mut ticks) = TokioTicker::channel();
    let mut engine = SessionEngine::new(store, ticker, &config).unwrap();
    engine.switch_mode(SessionKind::Infinite).unwrap();
    engine.start();

    for _ in 0..3 {
        let handle = ticks.recv().await.unwrap();
        clock.advance(Duration::seconds(1));
        engine.on_tick(handle).unwrap();
    }
    let event = engine.finish().unwrap().unwrap();
    assert_eq!(event.committed_entry().unwrap().duration_secs, 3);
    assert_eq!(engine.ticker().active_count(), 0);

    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    while let Ok(handle) = ticks.try_recv() {
        engine.on_tick(handle).unwrap();
    }
    assert_eq!(engine.remaining(), 0);
}
