use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;

use memmap2::Mmap;
use tracing::debug;

use crate::chunk::{Chunk, ChunkFuture};
use crate::error::{BytesError, BytesResult};

/// Byte-range provider boundary.
///
/// Remote transports (HTTP, xrootd-style protocols) implement this trait
/// outside the engine; the engine only ever asks for `[start, stop)` ranges
/// and the total size. `fetch_background` returns a future-style handle that
/// never blocks until `wait()` is called, so an abandoned fetch costs
/// nothing to the parse that skipped it.
pub trait Source: Send + Sync {
    fn fetch(&self, start: u64, stop: u64) -> BytesResult<Chunk>;

    fn fetch_background(&self, start: u64, stop: u64) -> ChunkFuture;

    fn num_bytes(&self) -> u64;
}

/// A source over a buffer already resident in memory. Test and
/// decompressed-data workhorse.
#[derive(Clone, Debug)]
pub struct MemorySource {
    data: Arc<Vec<u8>>,
}

impl MemorySource {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data: Arc::new(data) }
    }

    fn slice(&self, start: u64, stop: u64) -> BytesResult<Vec<u8>> {
        let len = self.data.len() as u64;
        if start > stop || stop > len {
            return Err(BytesError::OutOfRange {
                index: start,
                want: stop.saturating_sub(start),
                start: 0,
                stop: len,
            });
        }
        Ok(self.data[start as usize..stop as usize].to_vec())
    }
}

impl Source for MemorySource {
    fn fetch(&self, start: u64, stop: u64) -> BytesResult<Chunk> {
        Ok(Chunk::new(start, stop, self.slice(start, stop)?))
    }

    fn fetch_background(&self, start: u64, stop: u64) -> ChunkFuture {
        let (tx, rx) = mpsc::channel();
        // Already resident; deliver synchronously.
        let _ = tx.send(self.slice(start, stop));
        ChunkFuture::new(start, stop, rx)
    }

    fn num_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A memory-mapped local file source.
#[derive(Debug)]
pub struct FileSource {
    map: Arc<Mmap>,
}

impl FileSource {
    pub fn open(path: &Path) -> BytesResult<Self> {
        let file = std::fs::File::open(path)?;
        // Read-only map; the file is never written through this source.
        let map = unsafe { Mmap::map(&file)? };
        debug!(path = %path.display(), bytes = map.len(), "mapped file source");
        Ok(Self { map: Arc::new(map) })
    }

    fn slice(map: &Mmap, start: u64, stop: u64) -> BytesResult<Vec<u8>> {
        let len = map.len() as u64;
        if start > stop || stop > len {
            return Err(BytesError::OutOfRange {
                index: start,
                want: stop.saturating_sub(start),
                start: 0,
                stop: len,
            });
        }
        Ok(map[start as usize..stop as usize].to_vec())
    }
}

impl Source for FileSource {
    fn fetch(&self, start: u64, stop: u64) -> BytesResult<Chunk> {
        Ok(Chunk::new(start, stop, Self::slice(&self.map, start, stop)?))
    }

    fn fetch_background(&self, start: u64, stop: u64) -> ChunkFuture {
        let (tx, rx) = mpsc::channel();
        let map = Arc::clone(&self.map);
        std::thread::spawn(move || {
            let _ = tx.send(Self::slice(&map, start, stop));
        });
        ChunkFuture::new(start, stop, rx)
    }

    fn num_bytes(&self) -> u64 {
        self.map.len() as u64
    }
}
