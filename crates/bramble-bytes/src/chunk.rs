use std::sync::mpsc::Receiver;

use crate::error::{BytesError, BytesResult};

/// An immutable byte buffer covering the half-open range `[start, stop)` of
/// the logical file.
///
/// All positions handed to a [`Chunk`] are logical-file coordinates, not
/// buffer indices; the chunk translates internally. A chunk produced by
/// decompression spans `[0, uncompressed_len)` because decompressed bytes do
/// not preserve file offsets.
#[derive(Clone, Debug)]
pub struct Chunk {
    start: u64,
    stop: u64,
    buffer: Vec<u8>,
}

impl Chunk {
    /// Wrap a buffer covering `[start, stop)`.
    ///
    /// The buffer is allowed to be shorter than `stop - start` when the
    /// source intentionally truncated a tail read; reads into the missing
    /// region fail with `OutOfRange`.
    pub fn new(start: u64, stop: u64, buffer: Vec<u8>) -> Self {
        Self { start, stop, buffer }
    }

    /// A chunk spanning `[0, len)`, the shape produced by decompression.
    pub fn from_vec(buffer: Vec<u8>) -> Self {
        let stop = buffer.len() as u64;
        Self { start: 0, stop, buffer }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn stop(&self) -> u64 {
        self.stop
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whole backing buffer, without range translation.
    pub fn raw(&self) -> &[u8] {
        &self.buffer
    }

    /// Slice `[begin, end)` in logical-file coordinates.
    pub fn get(&self, begin: u64, end: u64) -> BytesResult<&[u8]> {
        if begin < self.start || end > self.stop || begin > end {
            return Err(BytesError::OutOfRange {
                index: begin,
                want: end.saturating_sub(begin),
                start: self.start,
                stop: self.stop,
            });
        }
        let lo = (begin - self.start) as usize;
        let hi = (end - self.start) as usize;
        // The buffer may be shorter than the declared range on padded or
        // truncated tail reads.
        if hi > self.buffer.len() {
            return Err(BytesError::OutOfRange {
                index: begin,
                want: end - begin,
                start: self.start,
                stop: self.start + self.buffer.len() as u64,
            });
        }
        Ok(&self.buffer[lo..hi])
    }

    /// Everything from `begin` to the end of the chunk.
    pub fn remainder(&self, begin: u64) -> BytesResult<&[u8]> {
        self.get(begin, self.start + self.buffer.len() as u64)
    }
}

/// A fetch in flight. Dropping the future abandons the fetch; nothing blocks
/// until [`ChunkFuture::wait`] is called.
#[derive(Debug)]
pub struct ChunkFuture {
    start: u64,
    stop: u64,
    rx: Receiver<BytesResult<Vec<u8>>>,
}

impl ChunkFuture {
    pub fn new(start: u64, stop: u64, rx: Receiver<BytesResult<Vec<u8>>>) -> Self {
        Self { start, stop, rx }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn stop(&self) -> u64 {
        self.stop
    }

    /// Block until the background fetch delivers, then assemble the chunk.
    ///
    /// Requested ranges always lie within the source's declared size, so a
    /// delivery shorter than the range means the transport broke mid-fetch.
    pub fn wait(self) -> BytesResult<Chunk> {
        match self.rx.recv() {
            Ok(Ok(buffer)) => {
                let want = self.stop - self.start;
                if (buffer.len() as u64) < want {
                    return Err(BytesError::TruncatedFetch {
                        want,
                        got: buffer.len() as u64,
                    });
                }
                Ok(Chunk::new(self.start, self.stop, buffer))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(BytesError::FetchAbandoned),
        }
    }
}
