use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Append-only byte sink owned by a single collection run.
///
/// Bytes go straight to the underlying writer on every `append`; nothing is
/// held back in an intermediate buffer. `close` flushes and releases the
/// writer and may be called any number of times.
#[derive(Debug)]
pub struct OutputStream<W: Write = File> {
    writer: Option<W>,
    written: u64,
}

impl OutputStream<File> {
    /// Opens `path` for writing, creating it or discarding its previous content.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        File::create(path).map(Self::new)
    }
}

impl<W: Write> OutputStream<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
            written: 0,
        }
    }

    pub fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        let writer = self.writer.as_mut().ok_or_else(closed)?;
        writer.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    pub fn close(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    /// Total bytes accepted by `append` so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }
}

impl<W: Write> Drop for OutputStream<W> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::error!("failed to close output stream: {}", e);
        }
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "output stream is closed")
}
