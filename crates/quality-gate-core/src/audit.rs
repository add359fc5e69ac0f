// crates/quality-gate-core/src/audit.rs
// ============================================================================
// Module: Quality Gate Run Events
// Description: Structured run events and JSON-lines sinks.
// Purpose: Record verifier and harness progress without touching report output.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Run events are emitted as one JSON object per line. Sinks never write to
//! stdout, which carries the reports consumed by CI. Write failures inside a
//! sink are dropped so logging cannot change a run's outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Run event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunEvent {
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event-specific fields, tagged by `event`.
    #[serde(flatten)]
    pub kind: RunEventKind,
}

impl RunEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn now(kind: RunEventKind) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_millis());
        Self {
            timestamp_ms,
            kind,
        }
    }
}

/// Event identifiers and their fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEventKind {
    /// Index verification began.
    VerifyStarted {
        /// Verification root.
        root: String,
        /// Resolved index path.
        index: String,
    },
    /// The index file parsed cleanly.
    IndexParsed {
        /// Number of entries parsed.
        entries: usize,
    },
    /// One index entry was classified.
    EntryChecked {
        /// Entry path relative to the root.
        path: String,
        /// Outcome label (`ok`, `missing`, `mismatch`).
        outcome: &'static str,
    },
    /// Index verification finished with a report.
    VerifyFinished {
        /// Entries whose digest matched.
        ok: usize,
        /// Entries whose file was absent.
        missing: usize,
        /// Entries whose digest differed.
        mismatch: usize,
    },
    /// Profiles were discovered and parsed.
    ProfilesDiscovered {
        /// Profile directory.
        directory: String,
        /// Number of profiles found.
        count: usize,
    },
    /// A case runner returned a result.
    CaseCompleted {
        /// Profile identifier.
        profile_id: String,
        /// Expected status after defaulting.
        expected_status: String,
    },
    /// The results document was written.
    ResultsPersisted {
        /// Output path.
        path: String,
        /// Number of results written.
        results: usize,
    },
    /// The harness run finished.
    HarnessFinished {
        /// Number of cases executed.
        cases: usize,
        /// Number of distinct profile identifiers.
        summarized: usize,
    },
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Run event sink.
pub trait RunEventSink: Send + Sync {
    /// Record a run event.
    fn record(&self, event: &RunEvent);
}

/// Sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl RunEventSink for StderrEventSink {
    fn record(&self, event: &RunEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the event log in append mode, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl RunEventSink for FileEventSink {
    fn record(&self, event: &RunEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Sink that drops every event.
pub struct NoopEventSink;

impl RunEventSink for NoopEventSink {
    fn record(&self, _event: &RunEvent) {}
}

/// Sink that keeps events in memory, for inspection in tests.
#[derive(Default)]
pub struct MemoryEventSink {
    /// Recorded events in emission order.
    events: Mutex<Vec<RunEvent>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the kinds of all recorded events in emission order.
    #[must_use]
    pub fn kinds(&self) -> Vec<RunEventKind> {
        self.events
            .lock()
            .map(|events| events.iter().map(|event| event.kind.clone()).collect())
            .unwrap_or_default()
    }
}

impl RunEventSink for MemoryEventSink {
    fn record(&self, event: &RunEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
