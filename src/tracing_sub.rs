//! Subscriber setup. Engine events go to the global [`DebugLogHandle`] once
//! one is installed, and to stderr before that.
//!
//! [`DebugLogHandle`]: crate::debug_log::DebugLogHandle

use std::io::{self, Write};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::debug_log::{DebugLogWriter, global_debug_log};

/// Per-event writer, resolved each time an event is formatted so a log
/// installed after [`init`] still receives output.
pub enum LogSink {
    Buffer(DebugLogWriter),
    Stderr(io::Stderr),
}

impl LogSink {
    fn resolve() -> Self {
        match global_debug_log() {
            Some(handle) => LogSink::Buffer(handle.writer()),
            None => LogSink::Stderr(io::stderr()),
        }
    }

    fn inner(&mut self) -> &mut dyn Write {
        match self {
            LogSink::Buffer(writer) => writer,
            LogSink::Stderr(stderr) => stderr,
        }
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner().flush()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MakeLogSink;

impl<'a> MakeWriter<'a> for MakeLogSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        LogSink::resolve()
    }
}

/// Map a `-v` count to a level. Any `-v` turns on trace events.
pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(MakeLogSink)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .try_init();
}
