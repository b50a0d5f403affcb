//! Line-oriented JSON output for the parent process

use crate::extractor::traits::LogSink;
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::{debug, error, warn};

/// Mutex-guarded writer emitting one compact JSON document per line
pub struct JsonLines {
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonLines {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Write `value` as a single line and flush immediately
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');

        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "output lock poisoned"))?;
        out.write_all(&line)?;
        out.flush()
    }

    pub fn emit_error(&self, message: &str) -> io::Result<()> {
        self.emit(&json!({ "error": message }))
    }

    pub fn flush(&self) -> io::Result<()> {
        match self.out.lock() {
            Ok(mut out) => out.flush(),
            Err(_) => Ok(()),
        }
    }
}

impl LogSink for JsonLines {
    fn debug(&self, msg: &str) {
        debug!(target: "engine", "{}", msg);
    }

    fn warning(&self, msg: &str) {
        warn!(target: "engine", "{}", msg);
        if let Err(e) = self.emit(&json!({ "warning": msg })) {
            error!("Failed to forward warning: {}", e);
        }
    }

    fn error(&self, msg: &str) {
        error!(target: "engine", "{}", msg);
    }
}
