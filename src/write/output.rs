//! Buffered byte output.
//!
//! The driver owns the destination file for the whole write: the handle is
//! acquired (truncating any previous contents) at entry and released on
//! every exit path when the writer drops. Output bytes accumulate in a
//! fixed-capacity buffer that flushes when the next write would not fit
//! and once more at shutdown.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Writes bytes to the destination file, tracking the total.
#[derive(Debug)]
pub struct ByteWriter {
    file: File,
    path: PathBuf,
    total_size: u64,
}

impl ByteWriter {
    /// Creates (or truncates) the destination file.
    pub fn create(path: impl AsRef<Path>) -> Result<ByteWriter> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(ByteWriter {
            file,
            path,
            total_size: 0,
        })
    }

    /// Returns the destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of bytes written so far.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Appends bytes to the file.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.file.write_all(bytes)?;
        self.total_size += bytes.len() as u64;
        Ok(())
    }
}

/// A fixed-capacity buffer in front of a [`ByteWriter`].
///
/// [`Self::finish`] must be called to push out whatever the final buffer
/// holds.
#[derive(Debug)]
pub struct BufferedOutput {
    buffer: Vec<u8>,
    capacity: usize,
    writer: ByteWriter,
}

impl BufferedOutput {
    /// Wraps a writer with a buffer of the given capacity.
    pub fn new(capacity: usize, writer: ByteWriter) -> BufferedOutput {
        BufferedOutput {
            buffer: Vec::new(),
            capacity,
            writer,
        }
    }

    /// Returns the underlying writer.
    pub fn writer(&self) -> &ByteWriter {
        &self.writer
    }

    /// Adds bytes to the buffer, flushing first when they would not fit.
    /// Byte runs at least as large as the whole buffer bypass it.
    pub fn add_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.buffer.len() + bytes.len() > self.capacity {
            self.flush()?;
            log::debug!(
                "starting a new output chunk; {} bytes written so far",
                self.writer.total_size(),
            );
        }
        if bytes.len() >= self.capacity {
            return self.writer.write_bytes(bytes);
        }
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Flushes the buffer to the writer.
    pub fn flush(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            self.writer.write_bytes(&self.buffer)?;
            self.buffer.clear();
        }
        Ok(())
    }

    /// Flushes and returns the writer.
    pub fn finish(mut self) -> Result<ByteWriter> {
        self.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_until_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buffered.bin");
        let writer = ByteWriter::create(&path).unwrap();
        let mut out = BufferedOutput::new(8, writer);

        out.add_bytes(&[1, 2, 3, 4]).unwrap();
        assert_eq!(out.writer().total_size(), 0, "still buffered");
        out.add_bytes(&[5, 6, 7]).unwrap();
        assert_eq!(out.writer().total_size(), 0);
        // The next write would overflow the buffer.
        out.add_bytes(&[8, 9]).unwrap();
        assert_eq!(out.writer().total_size(), 7);

        let writer = out.finish().unwrap();
        assert_eq!(writer.total_size(), 9);
        assert_eq!(std::fs::read(&path).unwrap(), (1..=9).collect::<Vec<u8>>());
    }

    #[test]
    fn oversized_runs_bypass_the_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let writer = ByteWriter::create(&path).unwrap();
        let mut out = BufferedOutput::new(4, writer);

        out.add_bytes(&[0; 10]).unwrap();
        assert_eq!(out.writer().total_size(), 10);
        out.finish().unwrap();
        assert_eq!(std::fs::read(&path).unwrap().len(), 10);
    }

    #[test]
    fn create_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.bin");
        std::fs::write(&path, b"leftover").unwrap();
        let mut writer = ByteWriter::create(&path).unwrap();
        writer.write_bytes(b"xy").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"xy");
    }
}
