//! One controller connection, from handoff to teardown.
//!
//! [`ControlSession::run`] decodes the handoff, spawns the egress and
//! ingress threads, and runs the [`TurnEngine`] on the calling thread.
//!
//! Teardown order:
//!
//! 1. The engine returns. Its event sender (and the census timer's) are gone.
//! 2. Egress drains every queued event, flushes, and exits.
//! 3. The socket is shut down, which unblocks ingress; ingress is joined.

use std::io::{self, BufReader, BufWriter, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use halo_core::{Event, Grid, GridError, Key, ParamsError};
use halo_engine::{EngineConfig, EngineError, Exit, TurnEngine, TurnMetrics};
use halo_wire::{decode_handoff, decode_key, encode_event, WireError};
use thiserror::Error;

// ── Error and report types ───────────────────────────────────────

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The peer sent something undecodable or the connection failed.
    #[error("wire: {0}")]
    Wire(#[from] WireError),
    /// The handoff carried invalid parameters.
    #[error("handoff params: {0}")]
    Params(#[from] ParamsError),
    /// The handoff carried cells outside the grid.
    #[error("handoff grid: {0}")]
    Grid(#[from] GridError),
    /// The engine rejected its configuration.
    #[error("engine: {0}")]
    Engine(#[from] EngineError),
    /// Socket setup failed.
    #[error("socket: {0}")]
    Socket(#[from] io::Error),
    /// A session thread could not be spawned.
    #[error("could not spawn {thread}: {source}")]
    Spawn {
        /// Name of the thread.
        thread: &'static str,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Summary of a finished session.
#[derive(Clone, Debug)]
pub struct SessionReport {
    /// Peer address, if known.
    pub peer: Option<SocketAddr>,
    /// Why the engine stopped.
    pub exit: Exit,
    /// Completed turns.
    pub turn: u64,
    /// Events written to the socket.
    pub events_written: u64,
    /// Keys received from the socket.
    pub keys_received: u64,
    /// Engine metrics.
    pub metrics: TurnMetrics,
}

// ── ControlSession ───────────────────────────────────────────────

/// A single controller connection.
pub struct ControlSession {
    stream: TcpStream,
    config: EngineConfig,
}

impl ControlSession {
    /// Wrap an accepted stream.
    pub fn new(stream: TcpStream, config: EngineConfig) -> Self {
        Self { stream, config }
    }

    /// Run the session to completion.
    ///
    /// Handoff errors end the session before any event is sent. A malformed
    /// key line, a lost connection, or a peer that stops reading for longer
    /// than the write timeout is returned as [`SessionError::Wire`] after
    /// teardown.
    pub fn run(self) -> Result<SessionReport, SessionError> {
        let peer = self.stream.peer_addr().ok();
        let mut reader = BufReader::new(self.stream.try_clone()?);

        let handoff = decode_handoff(&mut reader)?;
        let params = handoff.params;
        params.validate()?;
        params.check_cells(self.config.max_cells)?;
        let grid = Grid::from_alive(params.width, params.height, handoff.alive)?;
        tracing::info!(
            ?peer,
            width = params.width,
            height = params.height,
            workers = params.worker_count,
            turn_limit = params.turn_limit,
            alive = grid.alive_count(),
            "session started"
        );

        let (event_tx, event_rx) = crossbeam_channel::bounded(self.config.event_capacity);
        let (key_tx, key_rx) = crossbeam_channel::bounded(self.config.command_capacity);
        let engine = TurnEngine::new(params, grid, &self.config, event_tx, key_rx)?;

        let writer = self.stream.try_clone()?;
        writer.set_write_timeout(Some(self.config.write_timeout))?;
        let egress = spawn("halo-egress", move || egress_loop(writer, &event_rx))?;
        let ingress = spawn("halo-ingress", move || ingress_loop(reader, &key_tx))?;

        let report = engine.run();

        // Idle-drain: egress exits once every event sender is dropped.
        let egress_result = join(egress);
        tracing::debug!("egress drained");
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            tracing::debug!(error = %e, "socket shutdown");
        }
        let ingress_result = join(ingress);
        tracing::debug!("ingress joined");

        let events_written = egress_result?;
        let keys_received = match ingress_result {
            Ok(n) => n,
            // Our own shutdown can surface as a lost connection.
            Err(e) if e.is_disconnect() && report.exit != Exit::Disconnected => 0,
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            ?peer,
            exit = ?report.exit,
            turn = report.turn,
            events_written,
            mean_advance_us = report.metrics.mean_advance_us(),
            "session ended"
        );
        Ok(SessionReport {
            peer,
            exit: report.exit,
            turn: report.turn,
            events_written,
            keys_received,
            metrics: report.metrics,
        })
    }
}

fn spawn<T, F>(name: &'static str, f: F) -> Result<JoinHandle<T>, SessionError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new()
        .name(name.into())
        .spawn(f)
        .map_err(|source| SessionError::Spawn {
            thread: name,
            source,
        })
}

fn join<T>(handle: JoinHandle<T>) -> T {
    handle
        .join()
        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
}

/// Serialize events until every sender is gone. Flushes whenever the
/// channel is momentarily empty.
fn egress_loop(stream: TcpStream, events: &Receiver<Event>) -> Result<u64, WireError> {
    let mut w = BufWriter::new(stream);
    let mut written = 0u64;
    for event in events.iter() {
        if let Err(e) = encode_event(&mut w, &event) {
            tracing::warn!(error = %e, "egress write failed");
            return Err(e);
        }
        written += 1;
        if events.is_empty() {
            w.flush()?;
        }
    }
    w.flush()?;
    Ok(written)
}

/// Forward decoded keys to the engine until the peer closes or the engine
/// stops listening.
fn ingress_loop(mut reader: BufReader<TcpStream>, keys: &Sender<Key>) -> Result<u64, WireError> {
    let mut received = 0u64;
    loop {
        let key = match decode_key(&mut reader) {
            Ok(key) => key,
            Err(WireError::Closed) => return Ok(received),
            Err(e) => {
                tracing::warn!(error = %e, "ingress read failed");
                return Err(e);
            }
        };
        tracing::trace!(?key, "key received");
        if keys.send(key).is_err() {
            return Ok(received);
        }
        received += 1;
    }
}
