use bramble_bytes::{BytesResult, Chunk, Cursor};

use crate::plan::PrimKind;

/// A growable typed buffer of one scalar kind.
#[derive(Clone, Debug, PartialEq)]
pub enum PrimBuffer {
    Bool(Vec<bool>),
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl PrimBuffer {
    pub fn new(kind: PrimKind) -> Self {
        match kind {
            PrimKind::Bool => Self::Bool(Vec::new()),
            PrimKind::I8 => Self::I8(Vec::new()),
            PrimKind::U8 => Self::U8(Vec::new()),
            PrimKind::I16 => Self::I16(Vec::new()),
            PrimKind::U16 => Self::U16(Vec::new()),
            PrimKind::I32 => Self::I32(Vec::new()),
            PrimKind::U32 => Self::U32(Vec::new()),
            PrimKind::I64 => Self::I64(Vec::new()),
            PrimKind::U64 => Self::U64(Vec::new()),
            PrimKind::F32 => Self::F32(Vec::new()),
            PrimKind::F64 => Self::F64(Vec::new()),
        }
    }

    /// Decode one value off the wire and append it.
    pub fn read_one(&mut self, chunk: &Chunk, cursor: &mut Cursor) -> BytesResult<()> {
        match self {
            Self::Bool(v) => v.push(cursor.read_bool(chunk)?),
            Self::I8(v) => v.push(cursor.read_i8(chunk)?),
            Self::U8(v) => v.push(cursor.read_u8(chunk)?),
            Self::I16(v) => v.push(cursor.read_i16(chunk)?),
            Self::U16(v) => v.push(cursor.read_u16(chunk)?),
            Self::I32(v) => v.push(cursor.read_i32(chunk)?),
            Self::U32(v) => v.push(cursor.read_u32(chunk)?),
            Self::I64(v) => v.push(cursor.read_i64(chunk)?),
            Self::U64(v) => v.push(cursor.read_u64(chunk)?),
            Self::F32(v) => v.push(cursor.read_f32(chunk)?),
            Self::F64(v) => v.push(cursor.read_f64(chunk)?),
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U8(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::U64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Accumulated columnar data drained from a reader instance.
///
/// Counts are per-entry element counts, not yet cumulated into offsets;
/// reconstruction normalizes them.
#[derive(Clone, Debug, PartialEq)]
pub enum RawColumn {
    Primitive(PrimBuffer),
    /// Variable-length content: one count per entry.
    Jagged {
        counts: Vec<u64>,
        content: Box<RawColumn>,
    },
    /// Associative content: one count per entry, parallel key/value columns.
    Pairs {
        counts: Vec<u64>,
        keys: Box<RawColumn>,
        values: Box<RawColumn>,
    },
    /// String content: one byte count per entry over a flat byte buffer.
    Bytes { counts: Vec<u64>, data: Vec<u8> },
    /// Record content: ordered member columns.
    Record { fields: Vec<(String, RawColumn)> },
    /// Nothing accumulated (markers, or a reader never exercised).
    Empty,
}

impl RawColumn {
    /// Number of flat elements, where the notion applies.
    pub fn flat_len(&self) -> usize {
        match self {
            Self::Primitive(buf) => buf.len(),
            Self::Jagged { content, .. } => content.flat_len(),
            Self::Pairs { keys, .. } => keys.flat_len(),
            Self::Bytes { data, .. } => data.len(),
            Self::Record { .. } | Self::Empty => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_one_decodes_each_kind() {
        let mut wire = Vec::new();
        wire.push(1u8); // bool
        wire.extend_from_slice(&(-5i16).to_be_bytes());
        wire.extend_from_slice(&7u32.to_be_bytes());
        wire.extend_from_slice(&2.5f64.to_be_bytes());
        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);

        let mut b = PrimBuffer::new(PrimKind::Bool);
        b.read_one(&chunk, &mut cursor).unwrap();
        let mut s = PrimBuffer::new(PrimKind::I16);
        s.read_one(&chunk, &mut cursor).unwrap();
        let mut u = PrimBuffer::new(PrimKind::U32);
        u.read_one(&chunk, &mut cursor).unwrap();
        let mut d = PrimBuffer::new(PrimKind::F64);
        d.read_one(&chunk, &mut cursor).unwrap();

        assert_eq!(b, PrimBuffer::Bool(vec![true]));
        assert_eq!(s, PrimBuffer::I16(vec![-5]));
        assert_eq!(u, PrimBuffer::U32(vec![7]));
        assert_eq!(d, PrimBuffer::F64(vec![2.5]));
    }
}
