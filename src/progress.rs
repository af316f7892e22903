//! Sync progress reporting.
//!
//! Reports batch-level progress during `tsync sync` so operators can watch a
//! long full sync advance. Progress is emitted on **stderr** so stdout stays
//! reserved for the final summary. Reporting is advisory: it never affects
//! what gets synced.

use std::io::Write;

/// A single progress event for a sync job.
#[derive(Clone, Debug, PartialEq)]
pub enum SyncProgressEvent {
    /// Batch `batch` (1-based) came back from the source with `rows` rows.
    /// Never emitted for the empty fetch that ends a job.
    Fetched {
        entity: String,
        batch: u64,
        rows: u64,
    },
    /// Batch `batch` was imported: `ok` of `len` documents succeeded,
    /// `total` documents have succeeded so far.
    Imported {
        entity: String,
        batch: u64,
        ok: u64,
        len: u64,
        total: u64,
    },
}

/// Reports sync progress. Implementations write to stderr (human or JSON).
pub trait SyncProgressReporter: Send + Sync {
    /// Emit a progress event. Called from the sync loop.
    fn report(&self, event: SyncProgressEvent);
}

/// Human-friendly progress on stderr: "sync movies  batch 3  imported 99,998 / 100,000  total 299,998".
pub struct StderrProgress;

impl SyncProgressReporter for StderrProgress {
    fn report(&self, event: SyncProgressEvent) {
        let line = match &event {
            SyncProgressEvent::Fetched {
                entity,
                batch,
                rows,
            } => format!(
                "sync {}  batch {}  fetched {} rows\n",
                entity,
                batch,
                format_number(*rows)
            ),
            SyncProgressEvent::Imported {
                entity,
                batch,
                ok,
                len,
                total,
            } => format!(
                "sync {}  batch {}  imported {} / {}  total {}\n",
                entity,
                batch,
                format_number(*ok),
                format_number(*len),
                format_number(*total)
            ),
        };
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(line.as_bytes());
        let _ = err.flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl SyncProgressReporter for JsonProgress {
    fn report(&self, event: SyncProgressEvent) {
        let obj = match &event {
            SyncProgressEvent::Fetched {
                entity,
                batch,
                rows,
            } => serde_json::json!({
                "event": "progress",
                "entity": entity,
                "phase": "fetched",
                "batch": batch,
                "rows": rows,
            }),
            SyncProgressEvent::Imported {
                entity,
                batch,
                ok,
                len,
                total,
            } => serde_json::json!({
                "event": "progress",
                "entity": entity,
                "phase": "imported",
                "batch": batch,
                "ok": ok,
                "len": len,
                "total": total,
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let mut err = std::io::stderr().lock();
            let _ = writeln!(err, "{}", line);
            let _ = err.flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl SyncProgressReporter for NoProgress {
    fn report(&self, _event: SyncProgressEvent) {}
}

pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Parse a `--progress` value; `None` falls back to [`default_for_tty`](Self::default_for_tty).
    pub fn from_flag(flag: Option<&str>) -> anyhow::Result<Self> {
        match flag {
            None => Ok(Self::default_for_tty()),
            Some("off") => Ok(ProgressMode::Off),
            Some("human") => Ok(ProgressMode::Human),
            Some("json") => Ok(ProgressMode::Json),
            Some(other) => anyhow::bail!(
                "Unknown progress mode: '{}'. Must be off, human, or json.",
                other
            ),
        }
    }

    pub fn reporter(&self) -> Box<dyn SyncProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_comma() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(1), "1");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(100_000), "100,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn progress_flag_parsing() {
        assert_eq!(ProgressMode::from_flag(Some("json")).unwrap(), ProgressMode::Json);
        assert_eq!(ProgressMode::from_flag(Some("off")).unwrap(), ProgressMode::Off);
        assert!(ProgressMode::from_flag(Some("loud")).is_err());
    }
}
