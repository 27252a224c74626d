//! Client side of a session: hand off a grid, forward keys, and translate
//! the engine's event stream into controller-level events.
//!
//! Cell flips are not on the wire. The controller keeps the previous
//! generation and reports the difference against each `TurnComplete`; the
//! initially alive cells are reported as flips at turn 0.

use std::io::{self, BufReader};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::thread;

use crossbeam_channel::{select, Receiver, Sender};
use halo_core::{Cell, Event, Grid, GridError, Key, Params, ParamsError, RunState};
use halo_wire::{decode_event, encode_handoff, encode_key, WireError};
use thiserror::Error;

// ── Collaborators ────────────────────────────────────────────────

/// Destination for exported images.
///
/// `pixels` holds one byte per cell, row-major, 255 for alive and 0 for
/// dead.
pub trait ImageSink {
    /// Write one image.
    fn write_image(&mut self, name: &str, width: usize, height: usize, pixels: &[u8])
        -> io::Result<()>;

    /// Block until every pending write has finished.
    fn wait_idle(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Controller-level events derived from the engine stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    /// A cell changed state in `turn`.
    CellFlipped {
        /// Turn in which the flip happened.
        turn: u64,
        /// The cell.
        cell: Cell,
    },
    /// Every flip for `turn` has been reported.
    TurnComplete {
        /// Completed turns.
        turn: u64,
    },
    /// Periodic census.
    AliveCellsCount {
        /// Turn the count was taken at.
        turn: u64,
        /// Alive cells.
        count: usize,
    },
    /// An image was written to the sink.
    ImageOutputComplete {
        /// Turn the image shows.
        turn: u64,
        /// Name passed to the sink.
        filename: String,
    },
    /// The engine delivered its final state.
    FinalTurnComplete {
        /// Final turn.
        turn: u64,
        /// Alive cells at that turn.
        alive: Vec<Cell>,
    },
    /// The engine changed run state.
    StateChange {
        /// Turn at the change.
        turn: u64,
        /// New state.
        state: RunState,
    },
}

/// Errors that end a controller run.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The engine could not be reached.
    #[error("connect {addr}: {source}")]
    Connect {
        /// Engine address.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The parameters are invalid.
    #[error("invalid params: {0}")]
    Params(#[from] ParamsError),
    /// The initial grid is not `params.width x params.height`.
    #[error("initial grid is {width}x{height}, params disagree")]
    GridMismatch {
        /// Width of the supplied grid.
        width: usize,
        /// Height of the supplied grid.
        height: usize,
    },
    /// The engine sent cells outside the grid.
    #[error("grid: {0}")]
    Grid(#[from] GridError),
    /// The stream failed or carried garbage.
    #[error("wire: {0}")]
    Wire(#[from] WireError),
    /// The key forwarder could not be spawned.
    #[error("could not spawn key forwarder: {0}")]
    Spawn(#[source] io::Error),
}

/// Summary of a finished controller run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControllerReport {
    /// Last turn seen.
    pub turn: u64,
    /// Alive cells from the final state, if one arrived.
    pub final_alive: Option<Vec<Cell>>,
    /// Images successfully written.
    pub images_written: u64,
    /// Engine events decoded.
    pub events_read: u64,
}

// ── RemoteController ─────────────────────────────────────────────

/// A connected controller that has completed the handoff.
pub struct RemoteController {
    stream: TcpStream,
    params: Params,
    initial: Grid,
}

impl RemoteController {
    /// Dial `addr` and send the handoff for `initial`.
    pub fn connect(addr: SocketAddr, params: Params, initial: Grid) -> Result<Self, ControllerError> {
        params.validate()?;
        if (initial.width(), initial.height()) != (params.width, params.height) {
            return Err(ControllerError::GridMismatch {
                width: initial.width(),
                height: initial.height(),
            });
        }
        let mut stream =
            TcpStream::connect(addr).map_err(|source| ControllerError::Connect { addr, source })?;
        encode_handoff(&mut stream, &params, &initial.alive_cells())?;
        tracing::info!(%addr, alive = initial.alive_count(), "handoff sent");
        Ok(Self {
            stream,
            params,
            initial,
        })
    }

    /// Run until the engine quits or the connection fails.
    ///
    /// Characters from `keys` that are not `s`, `p`, or `q` are dropped.
    /// Controller events are sent to `events`; a dropped receiver is
    /// ignored.
    pub fn run(
        self,
        keys: Receiver<char>,
        sink: &mut dyn ImageSink,
        events: &Sender<ControllerEvent>,
    ) -> Result<ControllerReport, ControllerError> {
        let writer = self.stream.try_clone().map_err(WireError::from)?;
        let reader = BufReader::new(self.stream.try_clone().map_err(WireError::from)?);
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);
        let forwarder = thread::Builder::new()
            .name("halo-keys".into())
            .spawn(move || forward_keys(writer, &keys, &done_rx))
            .map_err(ControllerError::Spawn)?;

        let mut receiver = EventTranslator {
            params: self.params,
            last: self.initial,
            events,
            report: ControllerReport::default(),
        };
        let result = receiver.read_all(reader, sink);

        drop(done_tx);
        if forwarder.join().is_err() {
            tracing::warn!("key forwarder panicked");
        }
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            tracing::debug!(error = %e, "socket shutdown");
        }
        result.map(|()| receiver.report)
    }
}

fn forward_keys(mut writer: TcpStream, keys: &Receiver<char>, done: &Receiver<()>) {
    loop {
        select! {
            recv(keys) -> c => {
                let Ok(c) = c else { return };
                match Key::from_char(c) {
                    Some(key) => {
                        if let Err(e) = encode_key(&mut writer, key) {
                            tracing::debug!(error = %e, "key forwarder stopping");
                            return;
                        }
                    }
                    None => tracing::trace!(?c, "ignoring unmapped key"),
                }
            }
            recv(done) -> _ => return,
        }
    }
}

struct EventTranslator<'a> {
    params: Params,
    last: Grid,
    events: &'a Sender<ControllerEvent>,
    report: ControllerReport,
}

impl EventTranslator<'_> {
    fn read_all(
        &mut self,
        mut reader: BufReader<TcpStream>,
        sink: &mut dyn ImageSink,
    ) -> Result<(), ControllerError> {
        for cell in self.last.alive_cells() {
            self.emit(ControllerEvent::CellFlipped { turn: 0, cell });
        }
        loop {
            let event = decode_event(&mut reader)?;
            self.report.events_read += 1;
            self.report.turn = event.turn();
            if self.handle(event, sink)? {
                return Ok(());
            }
        }
    }

    /// Returns `true` once the engine has quit.
    fn handle(&mut self, event: Event, sink: &mut dyn ImageSink) -> Result<bool, ControllerError> {
        match event {
            Event::TurnComplete { turn, alive } => {
                let next = self.grid(alive)?;
                for cell in self.last.flips(&next) {
                    self.emit(ControllerEvent::CellFlipped { turn, cell });
                }
                self.emit(ControllerEvent::TurnComplete { turn });
                self.last = next;
            }
            Event::RenderTrigger { turn, alive } => {
                let grid = self.grid(alive)?;
                let filename = format!("{}x{}x{}", grid.width(), grid.height(), turn);
                match sink.write_image(&filename, grid.width(), grid.height(), &grid.to_pixels()) {
                    Ok(()) => {
                        self.report.images_written += 1;
                        self.emit(ControllerEvent::ImageOutputComplete { turn, filename });
                    }
                    Err(e) => tracing::warn!(error = %e, %filename, "image write failed"),
                }
            }
            Event::CensusReport { turn, alive_count } => {
                self.emit(ControllerEvent::AliveCellsCount {
                    turn,
                    count: alive_count,
                });
            }
            Event::FinalState { turn, alive } => {
                self.report.final_alive = Some(alive.clone());
                self.emit(ControllerEvent::FinalTurnComplete { turn, alive });
            }
            Event::Pause { turn } => self.emit(ControllerEvent::StateChange {
                turn,
                state: RunState::Paused,
            }),
            Event::Resume { turn } => self.emit(ControllerEvent::StateChange {
                turn,
                state: RunState::Executing,
            }),
            Event::Quit { turn } => {
                if let Err(e) = sink.wait_idle() {
                    tracing::warn!(error = %e, "image sink did not drain");
                }
                self.emit(ControllerEvent::StateChange {
                    turn,
                    state: RunState::Quitting,
                });
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn grid(&self, alive: Vec<Cell>) -> Result<Grid, GridError> {
        Grid::from_alive(self.params.width, self.params.height, alive)
    }

    fn emit(&self, event: ControllerEvent) {
        // The UI side may already be gone; the session still runs to Quit.
        let _ = self.events.send(event);
    }
}
