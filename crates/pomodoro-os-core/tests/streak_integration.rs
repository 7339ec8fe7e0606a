//! Streaks computed over logs produced by the engine.

use chrono::{Duration, Local, TimeZone};
use pomodoro_os_core::storage::StorageConfig;
use pomodoro_os_core::{
    compute_streaks, focus_minutes_on, group_by_date, today_focus_minutes, Clock, Config,
    LogStore, ManualClock, ManualTicker, MemoryKv, SessionEngine, SessionKind,
};

type Engine = SessionEngine<MemoryKv, ManualTicker, ManualClock>;

fn commit(engine: &mut Engine, clock: &ManualClock, secs: u64) {
    engine.start();
    for _ in 0..secs {
        clock.advance(Duration::seconds(1));
        engine.tick().unwrap();
    }
    engine.finish().unwrap();
}

#[test]
fn streaks_follow_commit_days() {
    let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap());
    let store = LogStore::with_clock(MemoryKv::new(), StorageConfig::default(), clock.clone());
    let mut engine = SessionEngine::new(store, ManualTicker::new(), &Config::default()).unwrap();

    // day D, twice
    commit(&mut engine, &clock, 600);
    clock.advance(Duration::hours(2));
    commit(&mut engine, &clock, 600);

    // an Infinite session on D+1 that must not count
    clock.advance(Duration::days(1));
    engine.switch_mode(SessionKind::Infinite).unwrap();
    commit(&mut engine, &clock, 900);
    engine.switch_mode(SessionKind::Pomodoro).unwrap();

    // D+1, then D+3
    commit(&mut engine, &clock, 600);
    clock.advance(Duration::days(2));
    commit(&mut engine, &clock, 600);

    let annotated = engine.logs_with_streaks();
    let streaks: Vec<u32> = annotated.iter().map(|a| a.streak).collect();
    assert_eq!(streaks, vec![1, 3, 0, 2, 1]);
    assert_eq!(annotated[2].entry.kind, SessionKind::Infinite);

    let groups = group_by_date(&annotated);
    let dates: Vec<&str> = groups.iter().map(|g| g.date.as_str()).collect();
    assert_eq!(dates, vec!["04/04/2024", "02/04/2024", "01/04/2024"]);
    assert_eq!(groups[1].entries.len(), 2);
}

#[test]
fn streak_map_covers_every_entry() {
    let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap());
    let store = LogStore::with_clock(MemoryKv::new(), StorageConfig::default(), clock.clone());
    let mut engine = SessionEngine::new(store, ManualTicker::new(), &Config::default()).unwrap();

    for _ in 0..5 {
        commit(&mut engine, &clock, 1500);
        clock.advance(Duration::days(1));
    }
    let streaks = compute_streaks(engine.logs());
    assert_eq!(streaks.len(), 5);
    let mut values: Vec<u32> = streaks.values().copied().collect();
    values.sort_unstable();
    assert_eq!(values, vec![1, 2, 3, 4, 5]);
}

#[test]
fn todays_focus_counts_only_todays_commits() {
    let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap());
    let store = LogStore::with_clock(MemoryKv::new(), StorageConfig::default(), clock.clone());
    let mut engine = SessionEngine::new(store, ManualTicker::new(), &Config::default()).unwrap();

    commit(&mut engine, &clock, 150);
    clock.advance(Duration::days(1));
    commit(&mut engine, &clock, 610);
    commit(&mut engine, &clock, 1200);

    let now = clock.now();
    assert_eq!(today_focus_minutes(engine.logs(), &now), 30);
    assert_eq!(focus_minutes_on(engine.logs(), "06/05/2024"), 2);
}
