#![forbid(unsafe_code)]

//! Frame traces: JSONL records of published frames and engine events.
//!
//! # Format
//!
//! One JSON object per line, tagged by `kind`:
//!
//! ```text
//! {"kind":"frame","seq":3,"at_ms":32,"phase":"entering","points":[...]}
//! {"kind":"event","at_ms":464,"event":{"event":"phase_changed","from":"exiting","to":"entering"}}
//! ```
//!
//! The checksum is FNV-1a (64-bit) over the exact JSONL text, newlines
//! included, so it changes whenever any recorded value changes.

use std::io::Write;

use huddle_runtime::{EngineEvent, FrameSnapshot, Phase};
use serde::{Deserialize, Serialize};

use crate::HarnessError;

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a 64-bit hash of `bytes`.
#[must_use]
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// One line of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEntry {
    /// The frame visible at the end of a display tick.
    Frame {
        seq: u64,
        at_ms: u64,
        phase: Phase,
        points: FrameSnapshot,
    },
    /// An engine event drained during a display tick.
    Event { at_ms: u64, event: EngineEvent },
}

/// Ordered trace of a replay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameTrace {
    entries: Vec<TraceEntry>,
}

impl FrameTrace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a published frame.
    pub fn push_frame(&mut self, seq: u64, at_ms: u64, phase: Phase, points: FrameSnapshot) {
        self.entries.push(TraceEntry::Frame {
            seq,
            at_ms,
            phase,
            points,
        });
    }

    /// Record an engine event.
    pub fn push_event(&mut self, at_ms: u64, event: EngineEvent) {
        self.entries.push(TraceEntry::Event { at_ms, event });
    }

    #[must_use]
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Frame entries only, as `(seq, at_ms, phase, points)`.
    pub fn frames(&self) -> impl Iterator<Item = (u64, u64, Phase, &FrameSnapshot)> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            TraceEntry::Frame {
                seq,
                at_ms,
                phase,
                points,
            } => Some((*seq, *at_ms, *phase, points)),
            TraceEntry::Event { .. } => None,
        })
    }

    /// Event entries only.
    pub fn events(&self) -> impl Iterator<Item = &EngineEvent> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            TraceEntry::Event { event, .. } => Some(event),
            TraceEntry::Frame { .. } => None,
        })
    }

    /// The last recorded frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&FrameSnapshot> {
        self.frames().last().map(|(_, _, _, points)| points)
    }

    /// Write the trace as JSON lines.
    pub fn write_jsonl<W: Write>(&self, mut out: W) -> Result<(), HarnessError> {
        for entry in &self.entries {
            serde_json::to_writer(&mut out, entry)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// The trace as JSON lines.
    pub fn to_jsonl(&self) -> Result<String, HarnessError> {
        let mut buf = Vec::new();
        self.write_jsonl(&mut buf)?;
        // serde_json only emits UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Parse a trace written by [`write_jsonl`](Self::write_jsonl). Blank
    /// lines are skipped.
    pub fn from_jsonl(text: &str) -> Result<Self, HarnessError> {
        let entries = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<Result<Vec<TraceEntry>, _>>()?;
        Ok(Self { entries })
    }

    /// FNV-1a checksum of the JSONL text.
    pub fn checksum(&self) -> Result<u64, HarnessError> {
        Ok(fnv1a64(self.to_jsonl()?.as_bytes()))
    }
}
