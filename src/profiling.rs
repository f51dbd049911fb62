//! # Scope Profiler
//!
//! Records how long named scopes take and writes them out as a Chrome trace
//! (`chrome://tracing` or Perfetto can open the file).
//!
//! ## Usage
//!
//! ```no_run
//! use imshell::profiling::Instrumentor;
//! use imshell::profile_scope;
//!
//! Instrumentor::begin_session("App", "profile.json").unwrap();
//! {
//!     profile_scope!("expensive work");
//!     // ...
//! }
//! Instrumentor::end_session().unwrap();
//! ```
//!
//! Scopes recorded while no session is active are dropped. Events are
//! written to the trace file as they complete; only the closing bracket is
//! left for [`Instrumentor::end_session`].

use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

/// Opens a profiling scope that lasts until the end of the enclosing block
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_guard = $crate::profiling::ProfileTimer::new($name);
    };
}

/// One completed scope, in Chrome trace "complete event" form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    pub cat: &'static str,
    /// Duration in microseconds
    pub dur: u64,
    pub name: &'static str,
    pub ph: &'static str,
    pub pid: u32,
    pub tid: u64,
    /// Start in microseconds since the session began
    pub ts: u64,
}

const TRACE_HEADER: &[u8] = br#"{"otherData":{},"traceEvents":["#;
const TRACE_FOOTER: &[u8] = b"]}";

struct Session {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
    started: Instant,
    count: usize,
}

impl Session {
    fn write_event(&mut self, event: &TraceEvent) -> io::Result<()> {
        if self.count > 0 {
            self.writer.write_all(b",")?;
        }
        serde_json::to_writer(&mut self.writer, event)?;
        self.count += 1;
        Ok(())
    }

    fn finish(mut self) -> io::Result<usize> {
        self.writer.write_all(TRACE_FOOTER)?;
        self.writer.flush()?;
        log::info!(
            "Wrote {} profiling events to {}",
            self.count,
            self.path.display()
        );
        Ok(self.count)
    }
}

static SESSION: Mutex<Option<Session>> = Mutex::new(None);

/// Process-wide collector for profiling scopes
pub struct Instrumentor;

impl Instrumentor {
    /// Starts streaming scopes into a trace file at `path`
    ///
    /// An already running session is ended (and closed) first. Fails if the
    /// trace file cannot be created, in which case no session is active.
    pub fn begin_session(name: impl Into<String>, path: impl Into<PathBuf>) -> io::Result<()> {
        let name = name.into();
        let path = path.into();
        let mut session = lock();

        if let Some(previous) = session.take() {
            log::error!(
                "Profiling session '{}' already open, ending it before starting '{}'",
                previous.name,
                name
            );
            let previous_path = previous.path.clone();
            if let Err(e) = previous.finish() {
                log::error!("Failed to write profile '{}': {}", previous_path.display(), e);
            }
        }

        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(TRACE_HEADER)?;

        *session = Some(Session {
            name,
            path,
            writer,
            started: Instant::now(),
            count: 0,
        });
        Ok(())
    }

    /// Ends the current session and closes its trace file
    ///
    /// Returns the number of events written. Without an active session this does
    /// nothing and returns zero.
    pub fn end_session() -> io::Result<usize> {
        match lock().take() {
            Some(session) => session.finish(),
            None => Ok(0),
        }
    }

    pub fn is_active() -> bool {
        lock().is_some()
    }

    fn record(name: &'static str, start: Instant, end: Instant) {
        let mut guard = lock();
        let Some(session) = guard.as_mut() else {
            return;
        };

        // Scopes that began before the session are clipped to its start
        let ts = start.saturating_duration_since(session.started).as_micros() as u64;
        let dur = end.saturating_duration_since(start).as_micros() as u64;

        let event = TraceEvent {
            cat: "function",
            dur,
            name,
            ph: "X",
            pid: 0,
            tid: current_thread_id(),
            ts,
        };

        if let Err(e) = session.write_event(&event) {
            log::error!(
                "Failed to write to profile '{}': {}. Stopping session '{}'",
                session.path.display(),
                e,
                session.name
            );
            *guard = None;
        }
    }
}

/// Guard created by [`profile_scope!`]; records its lifetime on drop
pub struct ProfileTimer {
    name: &'static str,
    start: Instant,
}

impl ProfileTimer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for ProfileTimer {
    fn drop(&mut self) {
        Instrumentor::record(self.name, self.start, Instant::now());
    }
}

fn lock() -> MutexGuard<'static, Option<Session>> {
    // A panic while holding the lock leaves at worst a truncated trace
    SESSION.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn current_thread_id() -> u64 {
    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    hasher.finish()
}
