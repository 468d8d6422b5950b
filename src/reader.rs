use std::io::{ErrorKind, Read};

use crate::Result;

pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;
pub const MAX_CHUNK_SIZE: usize = 4 * 1024 * 1024;

pub enum Chunk<'a> {
    Data(&'a [u8]),
    EndOfStream,
}

/// Pulls fixed-capacity blocks out of a borrowed byte source.
pub struct ChunkReader<R> {
    source: R,
    buffer: Box<[u8]>,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(source: R) -> Self {
        Self::with_capacity(source, DEFAULT_CHUNK_SIZE)
    }

    /// The capacity is clamped to `1..=MAX_CHUNK_SIZE`.
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        Self {
            source,
            buffer: vec![0; capacity.clamp(1, MAX_CHUNK_SIZE)].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Reads at most one chunk. A zero-length read is end of stream; short
    /// reads are data.
    pub fn next_chunk(&mut self) -> Result<Chunk<'_>> {
        loop {
            match self.source.read(&mut self.buffer) {
                Ok(0) => return Ok(Chunk::EndOfStream),
                Ok(len) => return Ok(Chunk::Data(&self.buffer[..len])),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}
