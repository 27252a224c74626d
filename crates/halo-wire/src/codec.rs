//! Encode/decode for handoff, event, and key messages.
//!
//! Every message is one or more `\n`-terminated ASCII lines. A trailing `\r`
//! before the newline is tolerated on decode. Cell lists are written as
//! `x y ` pairs (note the trailing space) on a single line; decoding accepts
//! any whitespace between fields.

use std::io::{BufRead, ErrorKind, Read, Write};

use halo_core::{Cell, Event, Key, Params};

use crate::error::WireError;

// ── Line limits ─────────────────────────────────────────────────

/// Longest accepted line that carries no cell list: event codes, turns,
/// counts, keys, and the handoff header. The terminator is not counted.
pub const MAX_FIELD_LINE: usize = 128;

/// Longest accepted cell-list line. The terminator is not counted.
pub const MAX_CELL_LINE: usize = 1 << 28;

// ── Event codes ─────────────────────────────────────────────────

/// Numeric code on the first line of every event message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventCode {
    /// `turn`, alive-cell line.
    RenderTrigger = 1,
    /// `turn`, alive-count line.
    CensusReport = 2,
    /// `turn`, alive-cell line.
    FinalState = 3,
    /// `turn`.
    Quit = 4,
    /// `turn`.
    Pause = 5,
    /// `turn`.
    Resume = 6,
    /// `turn`, alive-cell line.
    TurnComplete = 7,
}

impl EventCode {
    /// Code for an event.
    pub fn of(event: &Event) -> Self {
        match event {
            Event::RenderTrigger { .. } => Self::RenderTrigger,
            Event::CensusReport { .. } => Self::CensusReport,
            Event::FinalState { .. } => Self::FinalState,
            Event::Quit { .. } => Self::Quit,
            Event::Pause { .. } => Self::Pause,
            Event::Resume { .. } => Self::Resume,
            Event::TurnComplete { .. } => Self::TurnComplete,
        }
    }
}

impl TryFrom<u64> for EventCode {
    type Error = WireError;

    fn try_from(code: u64) -> Result<Self, WireError> {
        Ok(match code {
            1 => Self::RenderTrigger,
            2 => Self::CensusReport,
            3 => Self::FinalState,
            4 => Self::Quit,
            5 => Self::Pause,
            6 => Self::Resume,
            7 => Self::TurnComplete,
            _ => return Err(WireError::UnknownEventCode { code }),
        })
    }
}

// ── Handoff ─────────────────────────────────────────────────────

/// The opening message of a session: parameters and initial alive cells.
///
/// Decoding checks syntax only; [`Params::validate`] and grid bounds are
/// the receiver's concern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handoff {
    /// Session parameters.
    pub params: Params,
    /// Initially alive cells.
    pub alive: Vec<Cell>,
}

/// Write `<height> <width> <workers> <turnLimit>` then the alive-cell line.
pub fn encode_handoff(w: &mut dyn Write, params: &Params, alive: &[Cell]) -> Result<(), WireError> {
    writeln!(
        w,
        "{} {} {} {}",
        params.height, params.width, params.worker_count, params.turn_limit
    )?;
    write_cells(w, alive)
}

/// Read a handoff.
pub fn decode_handoff(r: &mut dyn BufRead) -> Result<Handoff, WireError> {
    let header = read_line(r, MAX_FIELD_LINE)?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    let &[height, width, workers, turns] = fields.as_slice() else {
        return Err(WireError::malformed(format!(
            "handoff header needs 4 fields, got {}: {header:?}",
            fields.len()
        )));
    };
    let params = Params {
        height: parse_usize(height, "height")?,
        width: parse_usize(width, "width")?,
        worker_count: parse_usize(workers, "worker count")?,
        turn_limit: parse_u64(turns, "turn limit")?,
    };
    let alive = parse_cells(&read_line(r, MAX_CELL_LINE)?)?;
    Ok(Handoff { params, alive })
}

// ── Events ──────────────────────────────────────────────────────

/// Write one event message.
pub fn encode_event(w: &mut dyn Write, event: &Event) -> Result<(), WireError> {
    writeln!(w, "{}", EventCode::of(event) as u8)?;
    writeln!(w, "{}", event.turn())?;
    match event {
        Event::RenderTrigger { alive, .. }
        | Event::FinalState { alive, .. }
        | Event::TurnComplete { alive, .. } => write_cells(w, alive),
        Event::CensusReport { alive_count, .. } => {
            writeln!(w, "{alive_count}")?;
            Ok(())
        }
        Event::Quit { .. } | Event::Pause { .. } | Event::Resume { .. } => Ok(()),
    }
}

/// Read one event message.
///
/// A stream that ends before or partway through a message yields `Closed`.
pub fn decode_event(r: &mut dyn BufRead) -> Result<Event, WireError> {
    let code = EventCode::try_from(parse_u64(&read_line(r, MAX_FIELD_LINE)?, "event code")?)?;
    let turn = parse_u64(&read_line(r, MAX_FIELD_LINE)?, "turn")?;
    Ok(match code {
        EventCode::RenderTrigger => Event::RenderTrigger {
            turn,
            alive: parse_cells(&read_line(r, MAX_CELL_LINE)?)?,
        },
        EventCode::CensusReport => Event::CensusReport {
            turn,
            alive_count: parse_usize(&read_line(r, MAX_FIELD_LINE)?, "alive count")?,
        },
        EventCode::FinalState => Event::FinalState {
            turn,
            alive: parse_cells(&read_line(r, MAX_CELL_LINE)?)?,
        },
        EventCode::Quit => Event::Quit { turn },
        EventCode::Pause => Event::Pause { turn },
        EventCode::Resume => Event::Resume { turn },
        EventCode::TurnComplete => Event::TurnComplete {
            turn,
            alive: parse_cells(&read_line(r, MAX_CELL_LINE)?)?,
        },
    })
}

// ── Keys ────────────────────────────────────────────────────────

/// Write a key line.
pub fn encode_key(w: &mut dyn Write, key: Key) -> Result<(), WireError> {
    writeln!(w, "{}", key.as_char())?;
    Ok(())
}

/// Read a key line. Anything but exactly `s`, `p`, or `q` is malformed.
pub fn decode_key(r: &mut dyn BufRead) -> Result<Key, WireError> {
    let line = read_line(r, MAX_FIELD_LINE)?;
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            Key::from_char(c).ok_or_else(|| WireError::malformed(format!("unknown key {c:?}")))
        }
        _ => Err(WireError::malformed(format!("bad key line {line:?}"))),
    }
}

// ── Line helpers ────────────────────────────────────────────────

/// Read one line with its terminator (`\n` or `\r\n`) removed.
///
/// Lines longer than `limit` bytes are malformed; at most `limit + 2` bytes
/// are buffered.
fn read_line(r: &mut dyn BufRead, limit: usize) -> Result<String, WireError> {
    let cap = limit as u64 + 2;
    let mut line = String::new();
    let n = Read::take(&mut *r, cap)
        .read_line(&mut line)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidData => WireError::malformed("line is not valid UTF-8"),
            _ => WireError::ConnectionLost(e),
        })?;
    if n == 0 {
        return Err(WireError::Closed);
    }
    let body = line.trim_end_matches('\n').trim_end_matches('\r').len();
    if body > limit || (n as u64 == cap && !line.ends_with('\n')) {
        return Err(WireError::malformed(format!("line exceeds {limit} bytes")));
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

fn parse_u64(field: &str, what: &str) -> Result<u64, WireError> {
    field
        .trim()
        .parse()
        .map_err(|_| WireError::malformed(format!("{what}: expected integer, got {field:?}")))
}

fn parse_usize(field: &str, what: &str) -> Result<usize, WireError> {
    field
        .trim()
        .parse()
        .map_err(|_| WireError::malformed(format!("{what}: expected integer, got {field:?}")))
}

fn parse_cells(line: &str) -> Result<Vec<Cell>, WireError> {
    let coords = line
        .split_whitespace()
        .map(|f| parse_usize(f, "cell coordinate"))
        .collect::<Result<Vec<_>, _>>()?;
    if coords.len() % 2 != 0 {
        return Err(WireError::malformed(format!(
            "cell list has odd coordinate count {}",
            coords.len()
        )));
    }
    Ok(coords
        .chunks_exact(2)
        .map(|xy| Cell::new(xy[0], xy[1]))
        .collect())
}

fn write_cells(w: &mut dyn Write, cells: &[Cell]) -> Result<(), WireError> {
    for c in cells {
        write!(w, "{} {} ", c.x, c.y)?;
    }
    writeln!(w)?;
    Ok(())
}
