//! Integration test: the turn engine's command handling and event stream.
//!
//! Drives a [`TurnEngine`] on its own thread through pause, snapshot,
//! resume, and quit, and checks the ordering guarantees a controller
//! relies on: no census or turn while paused, exactly one final state, and
//! nothing after `Quit`.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use halo_core::{Cell, Event, Grid, Key, Params};
use halo_engine::{EngineConfig, EngineReport, Exit, TurnEngine};
use halo_test_utils::patterns::{blinker_horizontal, blinker_vertical, block, glider};
use halo_test_utils::{random_grid, reference_after};

const WAIT: Duration = Duration::from_secs(10);

// ── Harness ────────────────────────────────────────────────────────

struct Running {
    keys: Sender<Key>,
    events: Receiver<Event>,
    handle: thread::JoinHandle<EngineReport>,
}

fn spawn(params: Params, grid: Grid, census: Duration) -> Running {
    let config = EngineConfig {
        census_period: census,
        ..EngineConfig::default()
    };
    let (event_tx, events) = crossbeam_channel::bounded(64);
    let (keys, key_rx) = crossbeam_channel::bounded(config.command_capacity);
    let engine = TurnEngine::new(params, grid, &config, event_tx, key_rx).unwrap();
    let handle = thread::spawn(move || engine.run());
    Running {
        keys,
        events,
        handle,
    }
}

fn params(grid: &Grid, workers: usize, turn_limit: u64) -> Params {
    Params {
        width: grid.width(),
        height: grid.height(),
        worker_count: workers,
        turn_limit,
    }
}

/// Receive events until one matches `pred`; return everything received.
fn until(events: &Receiver<Event>, pred: impl Fn(&Event) -> bool) -> Vec<Event> {
    let mut seen = Vec::new();
    loop {
        let ev = events.recv_timeout(WAIT).expect("engine stalled");
        let done = pred(&ev);
        seen.push(ev);
        if done {
            return seen;
        }
    }
}

fn drain(events: &Receiver<Event>) -> Vec<Event> {
    let mut seen = Vec::new();
    while let Ok(ev) = events.recv_timeout(WAIT) {
        seen.push(ev);
    }
    seen
}

// ── Turn limit ─────────────────────────────────────────────────────

#[test]
fn blinker_runs_to_turn_limit() {
    let start = blinker_horizontal(5, 5, 1, 2);
    let run = spawn(params(&start, 2, 3), start.clone(), Duration::from_secs(3600));
    let Running {
        keys,
        events,
        handle,
    } = run;
    let report = handle.join().unwrap();
    drop(keys);
    assert_eq!(report.exit, Exit::Completed);
    assert_eq!(report.turn, 3);
    assert_eq!(report.metrics.turns, 3);

    let seen = drain(&events);
    let vertical = blinker_vertical(5, 5, 1, 2).alive_cells();
    let horizontal = start.alive_cells();
    assert_eq!(
        seen,
        vec![
            Event::TurnComplete {
                turn: 1,
                alive: vertical.clone()
            },
            Event::TurnComplete {
                turn: 2,
                alive: horizontal
            },
            Event::TurnComplete {
                turn: 3,
                alive: vertical.clone()
            },
            Event::RenderTrigger {
                turn: 3,
                alive: vertical.clone()
            },
            Event::FinalState {
                turn: 3,
                alive: vertical
            },
            Event::Quit { turn: 3 },
        ]
    );
}

#[test]
fn block_is_unchanged_after_many_turns() {
    let start = block(16, 16, 7, 7);
    let run = spawn(params(&start, 4, 50), start.clone(), Duration::from_secs(3600));
    let report = run.handle.join().unwrap();
    assert_eq!(report.exit, Exit::Completed);
    assert_eq!(*report.grid, start);
}

#[test]
fn uneven_bands_match_reference() {
    let start = random_grid(37, 23, 0.35, 42);
    let run = spawn(params(&start, 5, 20), start.clone(), Duration::from_secs(3600));
    let report = run.handle.join().unwrap();
    assert_eq!(*report.grid, reference_after(&start, 20));
}

#[test]
fn glider_wraps_through_every_band_edge() {
    let start = glider(12, 12, 0, 0);
    // 48 turns: the glider crosses the whole torus and returns home.
    let run = spawn(params(&start, 3, 48), start.clone(), Duration::from_secs(3600));
    let report = run.handle.join().unwrap();
    assert_eq!(*report.grid, start);
}

// ── Commands ───────────────────────────────────────────────────────

#[test]
fn pause_snapshot_resume_quit() {
    let start = random_grid(24, 24, 0.3, 9);
    let run = spawn(
        params(&start, 4, u64::MAX),
        start.clone(),
        Duration::from_millis(5),
    );

    run.keys.send(Key::Pause).unwrap();
    let before = until(&run.events, |e| matches!(e, Event::Pause { .. }));
    let paused_at = before.last().unwrap().turn();
    let last_alive = before
        .iter()
        .rev()
        .find_map(|e| match e {
            Event::TurnComplete { alive, .. } => Some(alive.clone()),
            _ => None,
        })
        .unwrap_or_else(|| start.alive_cells());

    // Nothing is emitted while paused: no census, no turns.
    thread::sleep(Duration::from_millis(50));
    assert!(run.events.try_recv().is_err(), "event emitted while paused");

    run.keys.send(Key::Snapshot).unwrap();
    run.keys.send(Key::Pause).unwrap();
    let during = until(&run.events, |e| matches!(e, Event::Resume { .. }));
    assert_eq!(
        during,
        vec![
            Event::RenderTrigger {
                turn: paused_at,
                alive: last_alive.clone()
            },
            Event::Resume { turn: paused_at },
        ]
    );

    // Execution continues from exactly where it stopped.
    let next = until(&run.events, |e| matches!(e, Event::TurnComplete { .. }));
    let expected = reference_after(&Grid::from_alive(24, 24, last_alive).unwrap(), 1);
    assert_eq!(
        next.last(),
        Some(&Event::TurnComplete {
            turn: paused_at + 1,
            alive: expected.alive_cells()
        })
    );

    run.keys.send(Key::Quit).unwrap();
    let tail = until(&run.events, |e| matches!(e, Event::Quit { .. }));
    let report = run.handle.join().unwrap();
    assert_eq!(report.exit, Exit::Quit);
    assert_eq!(report.metrics.pauses, 1);
    assert_eq!(report.metrics.resumes, 1);

    let quit_turn = tail.last().unwrap().turn();
    assert_eq!(quit_turn, report.turn);
    let finals: Vec<&Event> = tail
        .iter()
        .filter(|e| matches!(e, Event::FinalState { .. }))
        .collect();
    assert_eq!(finals.len(), 1);
    assert_eq!(finals[0].turn(), quit_turn);

    // After FinalState only the quit marker follows.
    let pos = tail
        .iter()
        .position(|e| matches!(e, Event::FinalState { .. }))
        .unwrap();
    assert_eq!(&tail[pos + 1..], &[Event::Quit { turn: quit_turn }]);
    assert!(run.events.recv_timeout(Duration::from_millis(50)).is_err());
}

#[test]
fn quit_while_paused_delivers_final_state() {
    let start = block(8, 8, 1, 1);
    let run = spawn(params(&start, 2, u64::MAX), start, Duration::from_secs(3600));
    run.keys.send(Key::Pause).unwrap();
    let before = until(&run.events, |e| matches!(e, Event::Pause { .. }));
    let paused_at = before.last().unwrap().turn();

    run.keys.send(Key::Quit).unwrap();
    let tail = until(&run.events, |e| matches!(e, Event::Quit { .. }));
    let block_cells = vec![
        Cell::new(1, 1),
        Cell::new(2, 1),
        Cell::new(1, 2),
        Cell::new(2, 2),
    ];
    assert_eq!(
        tail,
        vec![
            Event::RenderTrigger {
                turn: paused_at,
                alive: block_cells.clone()
            },
            Event::FinalState {
                turn: paused_at,
                alive: block_cells
            },
            Event::Quit { turn: paused_at },
        ]
    );
    assert_eq!(run.handle.join().unwrap().exit, Exit::Quit);
}

#[test]
fn census_reports_while_executing() {
    let start = block(8, 8, 0, 0);
    let run = spawn(params(&start, 1, u64::MAX), start, Duration::from_millis(5));
    let seen = until(&run.events, |e| matches!(e, Event::CensusReport { .. }));
    match seen.last() {
        Some(Event::CensusReport { alive_count, .. }) => assert_eq!(*alive_count, 4),
        other => panic!("expected census, got {other:?}"),
    }
    run.keys.send(Key::Quit).unwrap();
    until(&run.events, |e| matches!(e, Event::Quit { .. }));
    run.handle.join().unwrap();
}

#[test]
fn dropped_controller_stops_engine_without_final_state() {
    let start = block(8, 8, 0, 0);
    let run = spawn(params(&start, 2, u64::MAX), start, Duration::from_secs(3600));
    let Running {
        keys,
        events,
        handle,
    } = run;
    drop(keys);
    let report = handle.join().unwrap();
    assert_eq!(report.exit, Exit::Disconnected);
    assert!(drain(&events)
        .iter()
        .all(|e| !matches!(e, Event::FinalState { .. } | Event::Quit { .. })));
}
