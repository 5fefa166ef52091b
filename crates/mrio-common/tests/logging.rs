//! Tests for the logging bootstrap.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use mrio_common::logging::{LogConfig, LogFormat, init_logging_with_writer};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

struct BufferGuard {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = BufferGuard;

    fn make_writer(&'a self) -> Self::Writer {
        BufferGuard {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

#[test]
fn json_logging_writes_structured_events_once() {
    let writer = BufferWriter::default();
    let config = LogConfig::default()
        .with_format(LogFormat::Json)
        .with_ansi(false);

    init_logging_with_writer(&config, writer.clone()).unwrap();
    tracing::warn!(target: "mrio_bridge", rule = 3, "rule matched no source rows");

    let output = String::from_utf8(writer.buffer.lock().unwrap().clone()).unwrap();
    assert!(output.contains("rule matched no source rows"));
    assert!(output.contains("\"rule\":3"));

    // A second installation is reported instead of panicking.
    assert!(init_logging_with_writer(&config, BufferWriter::default()).is_err());
}
