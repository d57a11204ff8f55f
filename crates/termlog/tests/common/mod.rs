//! Shared capture plumbing for the pipeline integration tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use termlog::{ColorMode, ConsoleSink, Flags, Logger};

/// Writer handing every byte to a shared buffer, so tests can keep a handle
/// to the output while the sink owns the writer.
#[derive(Clone, Default)]
pub struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl SharedWriter {
    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }

    pub fn string(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Builds an isolated pipeline over a capturing sink with pinned color
/// behaviour, so tests stay independent of the calling environment.
pub fn capture_pipeline(is_tty: bool, color: ColorMode, flags: Flags) -> (Logger, SharedWriter) {
    let writer = SharedWriter::default();
    let sink = ConsoleSink::with_parts(writer.clone(), is_tty, Some(color));
    let logger = Logger::with_sink(Arc::new(sink));
    logger.set_flags(flags);
    (logger, writer)
}
