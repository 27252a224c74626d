//! Controller commands, engine run states, and the engine event stream.

use std::fmt;

use crate::cell::Cell;

/// Run state of a turn engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Advancing turns and reporting census.
    Executing,
    /// Frozen: no turns, no census; waiting for resume, snapshot, or quit.
    Paused,
    /// Terminal.
    Quitting,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executing => write!(f, "Executing"),
            Self::Paused => write!(f, "Paused"),
            Self::Quitting => write!(f, "Quitting"),
        }
    }
}

/// A key-press command sent from the controller to the engine.
///
/// # Examples
///
/// ```
/// use halo_core::Key;
///
/// assert_eq!(Key::from_char('p'), Some(Key::Pause));
/// assert_eq!(Key::Quit.as_char(), 'q');
/// assert_eq!(Key::from_char('x'), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// `s`: export the current grid.
    Snapshot,
    /// `p`: pause when executing, resume when paused.
    Pause,
    /// `q`: export the current grid and quit.
    Quit,
}

impl Key {
    /// Map a key character to a command, if it is one.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            's' => Some(Self::Snapshot),
            'p' => Some(Self::Pause),
            'q' => Some(Self::Quit),
            _ => None,
        }
    }

    /// The key character for this command.
    pub fn as_char(self) -> char {
        match self {
            Self::Snapshot => 's',
            Self::Pause => 'p',
            Self::Quit => 'q',
        }
    }
}

/// A message emitted by the engine to the controller.
///
/// `turn` is always the number of completed turns at the time the event
/// was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Export the grid as an image (code 1).
    RenderTrigger {
        /// Completed turns.
        turn: u64,
        /// Alive cells, row-major.
        alive: Vec<Cell>,
    },
    /// Periodic alive-cell count (code 2).
    CensusReport {
        /// Completed turns at the time of the census tick.
        turn: u64,
        /// Number of alive cells.
        alive_count: usize,
    },
    /// Final alive cells before shutdown (code 3).
    FinalState {
        /// Completed turns.
        turn: u64,
        /// Alive cells, row-major.
        alive: Vec<Cell>,
    },
    /// The engine is quitting (code 4).
    Quit {
        /// Completed turns.
        turn: u64,
    },
    /// The engine has paused (code 5).
    Pause {
        /// Completed turns.
        turn: u64,
    },
    /// The engine has resumed (code 6).
    Resume {
        /// Completed turns.
        turn: u64,
    },
    /// A generation has been computed (code 7).
    TurnComplete {
        /// Completed turns, including this one.
        turn: u64,
        /// Alive cells at the end of the turn, row-major.
        alive: Vec<Cell>,
    },
}

impl Event {
    /// Completed-turn count carried by every event.
    pub fn turn(&self) -> u64 {
        match self {
            Self::RenderTrigger { turn, .. }
            | Self::CensusReport { turn, .. }
            | Self::FinalState { turn, .. }
            | Self::Quit { turn }
            | Self::Pause { turn }
            | Self::Resume { turn }
            | Self::TurnComplete { turn, .. } => *turn,
        }
    }
}
