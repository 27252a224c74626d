//! The turn loop and its Executing / Paused / Quitting state machine.
//!
//! [`TurnEngine`] owns the working grid, the [`ChunkScheduler`], and the
//! [`CensusTimer`]. It runs on the session thread; controller keys arrive on
//! a bounded channel and events leave on another. Neither channel is
//! touched by anything else in the engine, so the run state needs no lock.
//!
//! ```text
//!                 p                          q / turn limit
//!   Executing ---------> Paused      any ------------------> Quitting
//!       ^                  |
//!       +--------p---------+
//! ```
//!
//! Commands are checked with a non-blocking `try_recv` at every turn
//! boundary; a turn in progress always completes before a command is seen.
//! While paused the engine blocks on `recv` and does no grid work.

use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use halo_core::{Event, Grid, Key, Params, ParamsError, RunState};
use thiserror::Error;

use crate::census::CensusTimer;
use crate::config::{ConfigError, EngineConfig};
use crate::metrics::TurnMetrics;
use crate::scheduler::ChunkScheduler;
use crate::snapshot::SnapshotSlot;

// ── Error and report types ───────────────────────────────────────

/// Errors constructing a [`TurnEngine`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Session parameters are invalid.
    #[error("invalid params: {0}")]
    Params(#[from] ParamsError),
    /// Engine configuration is invalid.
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    /// The initial grid does not match the parameters.
    #[error("grid is {found_width}x{found_height}, params say {width}x{height}")]
    GridMismatch {
        /// Width from params.
        width: usize,
        /// Height from params.
        height: usize,
        /// Width of the supplied grid.
        found_width: usize,
        /// Height of the supplied grid.
        found_height: usize,
    },
}

/// Why the turn loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// The turn limit was reached and the final state delivered.
    Completed,
    /// The controller sent quit and the final state was delivered.
    Quit,
    /// The command or event channel closed; nothing further was delivered.
    Disconnected,
}

/// Outcome of [`TurnEngine::run`].
#[derive(Clone, Debug)]
pub struct EngineReport {
    /// Why the loop stopped.
    pub exit: Exit,
    /// Completed turns at exit.
    pub turn: u64,
    /// Grid at exit.
    pub grid: Arc<Grid>,
    /// Accumulated metrics.
    pub metrics: TurnMetrics,
}

/// A channel to the controller closed.
struct Disconnected;

type Step = Result<Option<Exit>, Disconnected>;

// ── TurnEngine ───────────────────────────────────────────────────

/// Drives a [`ChunkScheduler`] turn by turn under controller commands.
pub struct TurnEngine {
    params: Params,
    scheduler: ChunkScheduler,
    grid: Arc<Grid>,
    turn: u64,
    state: RunState,
    slot: Arc<SnapshotSlot>,
    census: CensusTimer,
    events: Sender<Event>,
    commands: Receiver<Key>,
    metrics: TurnMetrics,
}

impl TurnEngine {
    /// Build an engine at turn 0 in the `Executing` state.
    ///
    /// The census timer is not started until [`run`](Self::run).
    pub fn new(
        params: Params,
        grid: Grid,
        config: &EngineConfig,
        events: Sender<Event>,
        commands: Receiver<Key>,
    ) -> Result<Self, EngineError> {
        params.validate()?;
        config.validate()?;
        if (grid.width(), grid.height()) != (params.width, params.height) {
            return Err(EngineError::GridMismatch {
                width: params.width,
                height: params.height,
                found_width: grid.width(),
                found_height: grid.height(),
            });
        }
        let scheduler = ChunkScheduler::new(params.worker_count)?;
        let grid = Arc::new(grid);
        let slot = Arc::new(SnapshotSlot::new(0, Arc::clone(&grid)));
        let census = CensusTimer::new(config.census_period, Arc::clone(&slot), events.clone());
        Ok(Self {
            params,
            scheduler,
            grid,
            turn: 0,
            state: RunState::Executing,
            slot,
            census,
            events,
            commands,
            metrics: TurnMetrics::default(),
        })
    }

    /// Completed turns.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Current grid.
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    /// Run until the turn limit, a quit command, or a closed channel.
    ///
    /// The census timer is stopped and joined before this returns, so the
    /// engine holds no event sender afterwards other than the one it owns,
    /// which is dropped with the engine.
    pub fn run(mut self) -> EngineReport {
        tracing::debug!(
            width = self.params.width,
            height = self.params.height,
            workers = self.params.worker_count,
            turn_limit = self.params.turn_limit,
            "turn engine starting"
        );
        let exit = self.run_loop();
        self.census.stop();
        self.state = RunState::Quitting;
        tracing::debug!(turn = self.turn, ?exit, "turn engine stopped");
        EngineReport {
            exit,
            turn: self.turn,
            grid: self.grid,
            metrics: self.metrics,
        }
    }

    fn run_loop(&mut self) -> Exit {
        self.start_census();
        loop {
            let step = match self.state {
                RunState::Executing => self.execute(),
                RunState::Paused => self.wait_paused(),
                RunState::Quitting => return Exit::Quit,
            };
            match step {
                Ok(Some(exit)) => return exit,
                Ok(None) => {}
                Err(Disconnected) => return Exit::Disconnected,
            }
        }
    }

    /// One Executing iteration: drain pending keys, then advance a turn.
    fn execute(&mut self) -> Step {
        while self.state == RunState::Executing {
            match self.commands.try_recv() {
                Ok(key) => {
                    if let Some(exit) = self.handle_key(key)? {
                        return Ok(Some(exit));
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Err(Disconnected),
            }
        }
        if self.state != RunState::Executing {
            return Ok(None);
        }
        if self.turn >= self.params.turn_limit {
            self.finish()?;
            return Ok(Some(Exit::Completed));
        }
        self.advance()?;
        Ok(None)
    }

    /// Block until the next key while paused.
    fn wait_paused(&mut self) -> Step {
        match self.commands.recv() {
            Ok(key) => self.handle_key(key),
            Err(_) => Err(Disconnected),
        }
    }

    fn handle_key(&mut self, key: Key) -> Step {
        match key {
            Key::Snapshot => {
                self.metrics.snapshots += 1;
                self.emit(Event::RenderTrigger {
                    turn: self.turn,
                    alive: self.grid.alive_cells(),
                })?;
                Ok(None)
            }
            Key::Pause => {
                match self.state {
                    RunState::Executing => self.pause()?,
                    RunState::Paused => self.resume()?,
                    RunState::Quitting => {}
                }
                Ok(None)
            }
            Key::Quit => {
                self.finish()?;
                Ok(Some(Exit::Quit))
            }
        }
    }

    fn pause(&mut self) -> Result<(), Disconnected> {
        // Stop (and join) the census first so no report can follow Pause.
        self.census.stop();
        self.state = RunState::Paused;
        self.metrics.pauses += 1;
        tracing::debug!(turn = self.turn, "paused");
        self.emit(Event::Pause { turn: self.turn })
    }

    fn resume(&mut self) -> Result<(), Disconnected> {
        self.state = RunState::Executing;
        self.metrics.resumes += 1;
        tracing::debug!(turn = self.turn, "resumed");
        self.emit(Event::Resume { turn: self.turn })?;
        self.start_census();
        Ok(())
    }

    /// Deliver the final state and enter `Quitting`.
    fn finish(&mut self) -> Result<(), Disconnected> {
        self.census.stop();
        self.state = RunState::Quitting;
        let alive = self.grid.alive_cells();
        self.emit(Event::RenderTrigger {
            turn: self.turn,
            alive: alive.clone(),
        })?;
        self.emit(Event::FinalState {
            turn: self.turn,
            alive,
        })?;
        self.emit(Event::Quit { turn: self.turn })
    }

    fn advance(&mut self) -> Result<(), Disconnected> {
        let start = Instant::now();
        let next = self.scheduler.advance(&self.grid);
        let us = start.elapsed().as_micros() as u64;

        self.turn += 1;
        self.grid = Arc::new(next);
        self.slot.publish(self.turn, Arc::clone(&self.grid));
        self.metrics.record_advance(us);
        tracing::trace!(turn = self.turn, advance_us = us, "turn complete");

        self.emit(Event::TurnComplete {
            turn: self.turn,
            alive: self.grid.alive_cells(),
        })
    }

    fn start_census(&mut self) {
        if let Err(e) = self.census.start() {
            tracing::warn!(error = %e, "census thread could not be spawned; census disabled");
        }
    }

    fn emit(&self, event: Event) -> Result<(), Disconnected> {
        self.events.send(event).map_err(|_| Disconnected)
    }
}
