//! Consumers of the `(hash, position)` stream.
//!
//! Every pipeline stage that receives hashes implements [`HashSink`]; stages
//! that forward own the next stage and are composed explicitly.
//!
//! Persisted record format (big endian):
//! `[magic: "WNRC"][version: u16]` followed by 12-byte records
//! `[hash: i32][position: u64]`.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};

use crate::error::{FingerprintError, Result};
use crate::types::HashPosition;

pub const RECORD_MAGIC: [u8; 4] = *b"WNRC";
pub const RECORD_VERSION: u16 = 1;
pub const RECORD_LEN: usize = 12;

/// Receiver of hashes in non-decreasing position order.
pub trait HashSink {
    fn accept(&mut self, hash: i32, position: usize) -> Result<()>;

    /// End of document. Buffering stages flush downstream here.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    /// Drop per-document state before reuse.
    fn reset(&mut self) {}
}

impl<S: HashSink + ?Sized> HashSink for &mut S {
    fn accept(&mut self, hash: i32, position: usize) -> Result<()> {
        (**self).accept(hash, position)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

impl<S: HashSink + ?Sized> HashSink for Box<S> {
    fn accept(&mut self, hash: i32, position: usize) -> Result<()> {
        (**self).accept(hash, position)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Collects every accepted pair in memory.
#[derive(Clone, Debug, Default)]
pub struct VecSink {
    records: Vec<HashPosition>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[HashPosition] {
        &self.records
    }

    pub fn hashes(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.hash).collect()
    }

    pub fn positions(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.position).collect()
    }

    pub fn into_records(self) -> Vec<HashPosition> {
        self.records
    }
}

impl HashSink for VecSink {
    fn accept(&mut self, hash: i32, position: usize) -> Result<()> {
        self.records.push(HashPosition::new(hash, position));
        Ok(())
    }

    fn reset(&mut self) {
        self.records.clear();
    }
}

/// Counts accepted pairs without keeping them.
#[derive(Clone, Copy, Debug, Default)]
pub struct CountingSink {
    pub count: usize,
}

impl HashSink for CountingSink {
    fn accept(&mut self, _hash: i32, _position: usize) -> Result<()> {
        self.count += 1;
        Ok(())
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}

/// Writes fixed-width binary records.
pub struct RecordWriter<W: Write> {
    writer: W,
    written: u64,
}

impl RecordWriter<BufWriter<File>> {
    /// Create (or truncate) a record file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        tracing::info!("writing hash records to {}", path.display());
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> RecordWriter<W> {
    /// Wrap `writer`, emitting the header immediately.
    pub fn new(mut writer: W) -> Result<Self> {
        writer.write_all(&RECORD_MAGIC)?;
        writer.write_u16::<BigEndian>(RECORD_VERSION)?;
        Ok(Self {
            writer,
            written: 0,
        })
    }

    pub fn records_written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> HashSink for RecordWriter<W> {
    fn accept(&mut self, hash: i32, position: usize) -> Result<()> {
        self.writer.write_i32::<BigEndian>(hash)?;
        self.writer.write_u64::<BigEndian>(position as u64)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        tracing::debug!("flushed {} hash records", self.written);
        Ok(())
    }
}

/// Reads records written by [`RecordWriter`].
pub struct RecordReader<R: Read> {
    reader: R,
    done: bool,
}

impl RecordReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read> RecordReader<R> {
    /// Validate the header and position the reader at the first record.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic).map_err(header_error)?;
        if magic != RECORD_MAGIC {
            return Err(FingerprintError::InvalidRecord(format!(
                "bad magic {:02x?}",
                magic
            )));
        }
        let version = reader.read_u16::<BigEndian>().map_err(header_error)?;
        if version != RECORD_VERSION {
            return Err(FingerprintError::InvalidRecord(format!(
                "unsupported version {}",
                version
            )));
        }
        Ok(Self {
            reader,
            done: false,
        })
    }

    pub fn read_all(self) -> Result<Vec<HashPosition>> {
        self.collect()
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<HashPosition>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut buf = [0u8; RECORD_LEN];
        let filled = match self.fill(&mut buf) {
            Ok(n) => n,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        match filled {
            0 => {
                self.done = true;
                None
            }
            RECORD_LEN => {
                let hash = BigEndian::read_i32(&buf[..4]);
                let position = BigEndian::read_u64(&buf[4..]);
                Some(
                    usize::try_from(position)
                        .map(|position| HashPosition::new(hash, position))
                        .map_err(|_| {
                            FingerprintError::InvalidRecord(format!(
                                "position {} out of range",
                                position
                            ))
                        }),
                )
            }
            partial => {
                self.done = true;
                Some(Err(FingerprintError::InvalidRecord(format!(
                    "truncated record ({} of {} bytes)",
                    partial, RECORD_LEN
                ))))
            }
        }
    }
}

fn header_error(e: std::io::Error) -> FingerprintError {
    if e.kind() == ErrorKind::UnexpectedEof {
        FingerprintError::InvalidRecord("missing record header".to_string())
    } else {
        e.into()
    }
}
