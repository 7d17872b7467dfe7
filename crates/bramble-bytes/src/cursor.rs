use crate::chunk::Chunk;
use crate::error::{BytesError, BytesResult};

/// Length prefix sentinel: a 1-byte length of `0xFF` means a 4-byte
/// big-endian length follows.
const LONG_LENGTH_SENTINEL: u8 = 0xFF;

/// A mutable read position over a [`Chunk`].
///
/// `index` is a logical-file position; `origin` is the zero point used when
/// computing relative displacements (reference-table keys are expressed
/// relative to the chunk origin, not as absolute file offsets). A cursor
/// lives for the duration of one parse and is never shared across threads.
#[derive(Clone, Copy, Debug)]
pub struct Cursor {
    index: u64,
    origin: u64,
}

macro_rules! read_be {
    ($name:ident, $peek:ident, $ty:ty) => {
        pub fn $name(&mut self, chunk: &Chunk) -> BytesResult<$ty> {
            let bytes = self.take(chunk, std::mem::size_of::<$ty>() as u64)?;
            Ok(<$ty>::from_be_bytes(bytes.try_into().unwrap()))
        }

        /// Decode without advancing.
        pub fn $peek(&self, chunk: &Chunk) -> BytesResult<$ty> {
            let mut probe = *self;
            probe.$name(chunk)
        }
    };
}

impl Cursor {
    pub fn new(index: u64) -> Self {
        Self { index, origin: 0 }
    }

    /// A cursor whose displacements are measured from `origin`.
    pub fn with_origin(index: u64, origin: u64) -> Self {
        Self { index, origin }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn origin(&self) -> u64 {
        self.origin
    }

    /// Position relative to the cursor origin.
    pub fn displacement(&self) -> u64 {
        self.index - self.origin
    }

    /// Signed distance from an arbitrary reference position.
    pub fn displacement_from(&self, reference: u64) -> i64 {
        self.index as i64 - reference as i64
    }

    pub fn skip(&mut self, n: u64) {
        self.index += n;
    }

    pub fn move_to(&mut self, index: u64) {
        self.index = index;
    }

    fn take<'a>(&mut self, chunk: &'a Chunk, n: u64) -> BytesResult<&'a [u8]> {
        let bytes = chunk.get(self.index, self.index + n)?;
        self.index += n;
        Ok(bytes)
    }

    read_be!(read_u8, peek_u8, u8);
    read_be!(read_i8, peek_i8, i8);
    read_be!(read_u16, peek_u16, u16);
    read_be!(read_i16, peek_i16, i16);
    read_be!(read_u32, peek_u32, u32);
    read_be!(read_i32, peek_i32, i32);
    read_be!(read_u64, peek_u64, u64);
    read_be!(read_i64, peek_i64, i64);
    read_be!(read_f32, peek_f32, f32);
    read_be!(read_f64, peek_f64, f64);

    pub fn read_bool(&mut self, chunk: &Chunk) -> BytesResult<bool> {
        Ok(self.read_u8(chunk)? != 0)
    }

    /// Read exactly `n` raw bytes.
    pub fn read_bytes<'a>(&mut self, chunk: &'a Chunk, n: u64) -> BytesResult<&'a [u8]> {
        self.take(chunk, n)
    }

    /// A length-prefixed string: 1-byte length, or a `0xFF` sentinel
    /// followed by a 4-byte big-endian length, then that many raw bytes.
    pub fn read_string<'a>(&mut self, chunk: &'a Chunk) -> BytesResult<&'a [u8]> {
        let short = self.read_u8(chunk)?;
        let length = if short == LONG_LENGTH_SENTINEL {
            self.read_u32(chunk)? as u64
        } else {
            short as u64
        };
        self.take(chunk, length)
    }

    /// Scan forward to a NUL terminator and return the bytes before it,
    /// leaving the cursor just past the NUL.
    pub fn read_c_string<'a>(&mut self, chunk: &'a Chunk) -> BytesResult<&'a [u8]> {
        let rest = chunk.remainder(self.index)?;
        match rest.iter().position(|&b| b == 0) {
            Some(nul) => {
                let bytes = &rest[..nul];
                self.index += nul as u64 + 1;
                Ok(bytes)
            }
            None => Err(BytesError::MissingNul { index: self.index }),
        }
    }
}
