//! Cancelable periodic alive-cell census.
//!
//! The census runs on its own thread, independent of the turn rate. Each
//! tick reads the latest published generation from the [`SnapshotSlot`] and
//! emits an [`Event::CensusReport`]. The [`TurnEngine`](crate::TurnEngine)
//! owns the timer and starts/stops it together with its run-state
//! transitions; [`CensusTimer::stop`] joins the thread, so once it returns no
//! further report can be emitted.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{select, Receiver, Sender, TryRecvError};
use halo_core::Event;

use crate::snapshot::SnapshotSlot;

struct Running {
    /// Dropping this disconnects the thread's cancel receiver.
    cancel: Sender<()>,
    handle: JoinHandle<()>,
}

/// A restartable fixed-period census task.
pub struct CensusTimer {
    period: Duration,
    slot: Arc<SnapshotSlot>,
    events: Sender<Event>,
    running: Option<Running>,
}

impl CensusTimer {
    /// Create a stopped timer that will report from `slot` into `events`.
    pub fn new(period: Duration, slot: Arc<SnapshotSlot>, events: Sender<Event>) -> Self {
        Self {
            period,
            slot,
            events,
            running: None,
        }
    }

    /// Whether the census thread is currently running.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Start the census thread. No-op if already running.
    ///
    /// The first report fires one full period after start.
    pub fn start(&mut self) -> io::Result<()> {
        if self.running.is_some() {
            return Ok(());
        }
        let (cancel, cancel_rx) = crossbeam_channel::bounded::<()>(1);
        let slot = Arc::clone(&self.slot);
        let events = self.events.clone();
        let period = self.period;
        let handle = thread::Builder::new()
            .name("halo-census".into())
            .spawn(move || census_loop(period, &slot, &events, &cancel_rx))?;
        self.running = Some(Running { cancel, handle });
        tracing::debug!(period_ms = period.as_millis() as u64, "census started");
        Ok(())
    }

    /// Stop the census thread and wait for it to exit. No-op if stopped.
    pub fn stop(&mut self) {
        if let Some(Running { cancel, handle }) = self.running.take() {
            drop(cancel);
            if handle.join().is_err() {
                tracing::warn!("census thread panicked");
            }
            tracing::debug!("census stopped");
        }
    }
}

impl Drop for CensusTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn census_loop(
    period: Duration,
    slot: &SnapshotSlot,
    events: &Sender<Event>,
    cancel: &Receiver<()>,
) {
    let ticker = crossbeam_channel::tick(period);
    loop {
        select! {
            recv(cancel) -> _ => break,
            recv(ticker) -> _ => {
                // A tick and a cancel can be ready together; cancel wins.
                if !matches!(cancel.try_recv(), Err(TryRecvError::Empty)) {
                    break;
                }
                let latest = slot.latest();
                let report = Event::CensusReport {
                    turn: latest.turn,
                    alive_count: latest.grid.alive_count(),
                };
                if events.send(report).is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::{Cell, Grid};

    fn slot_with(turn: u64, alive: &[Cell]) -> Arc<SnapshotSlot> {
        let grid = Grid::from_alive(8, 8, alive.iter().copied()).unwrap();
        Arc::new(SnapshotSlot::new(turn, Arc::new(grid)))
    }

    #[test]
    fn reports_latest_snapshot() {
        let slot = slot_with(5, &[Cell::new(0, 0), Cell::new(1, 1), Cell::new(2, 2)]);
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut timer = CensusTimer::new(Duration::from_millis(10), slot, tx);
        timer.start().unwrap();

        let report = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(
            report,
            Event::CensusReport {
                turn: 5,
                alive_count: 3
            }
        );
        timer.stop();
    }

    #[test]
    fn no_reports_after_stop() {
        let slot = slot_with(0, &[]);
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut timer = CensusTimer::new(Duration::from_millis(5), slot, tx);
        timer.start().unwrap();
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        timer.stop();
        assert!(!timer.is_running());

        while rx.try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(40));
        assert!(rx.try_recv().is_err(), "census reported after stop()");
    }

    #[test]
    fn restart_after_stop() {
        let slot = slot_with(2, &[Cell::new(3, 3)]);
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut timer = CensusTimer::new(Duration::from_millis(5), Arc::clone(&slot), tx);
        timer.start().unwrap();
        timer.stop();
        while rx.try_recv().is_ok() {}

        slot.publish(9, Arc::new(Grid::new(8, 8).unwrap()));
        timer.start().unwrap();
        let report = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(
            report,
            Event::CensusReport {
                turn: 9,
                alive_count: 0
            }
        );
    }

    #[test]
    fn start_is_idempotent() {
        let slot = slot_with(0, &[]);
        let (tx, _rx) = crossbeam_channel::unbounded();
        let mut timer = CensusTimer::new(Duration::from_secs(60), slot, tx);
        timer.start().unwrap();
        timer.start().unwrap();
        assert!(timer.is_running());
        timer.stop();
        timer.stop();
        assert!(!timer.is_running());
    }

    #[test]
    fn exits_when_event_receiver_dropped() {
        let slot = slot_with(0, &[]);
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut timer = CensusTimer::new(Duration::from_millis(5), slot, tx);
        drop(rx);
        timer.start().unwrap();
        thread::sleep(Duration::from_millis(30));
        // Joins promptly: the thread already exited on the failed send.
        timer.stop();
    }
}
