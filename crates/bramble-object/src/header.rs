use bramble_bytes::{Chunk, Cursor};

use crate::error::{ObjectError, ObjectResult};

/// Top bit of the 4-byte probe that marks it as a byte count.
pub const BYTE_COUNT_MASK: u32 = 0x4000_0000;
/// Tag announcing a class seen for the first time in this object graph.
pub const NEW_CLASS_TAG: u32 = 0xFFFF_FFFF;
/// Bit distinguishing class back-references from object references.
pub const CLASS_REF_MASK: u32 = 0x8000_0000;
/// Added to origin-relative displacements when keying the reference table.
pub const REF_KEY_OFFSET: u64 = 2;
/// Bit within the version word marking member-wise serialization.
pub const MEMBERWISE_BIT: u16 = 0x4000;

/// A decoded byte-count/version header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumBytesVersion {
    /// Total bytes of the object including this header's own two fields,
    /// when the writer recorded one.
    pub num_bytes: Option<u32>,
    pub version: u16,
    pub is_memberwise: bool,
}

/// Read the `[num_bytes?][version]` header preceding a versioned object.
///
/// The 4-byte probe is a byte count only when its marker bit is set; masked,
/// plus 4 to cover the count and version fields themselves (the count on the
/// wire is measured from just after the count field). A clear marker bit
/// means the writer emitted no count: rewind and read only the 2-byte
/// version. The member-wise bit is stripped from the version and reported
/// separately.
pub fn read_numbytes_version(chunk: &Chunk, cursor: &mut Cursor) -> ObjectResult<NumBytesVersion> {
    let probe = cursor.read_u32(chunk)?;
    let num_bytes = if probe & BYTE_COUNT_MASK != 0 {
        Some((probe & !BYTE_COUNT_MASK) + 4)
    } else {
        cursor.move_to(cursor.index() - 4);
        None
    };
    let raw_version = cursor.read_u16(chunk)?;
    Ok(NumBytesVersion {
        num_bytes,
        version: raw_version & !MEMBERWISE_BIT,
        is_memberwise: raw_version & MEMBERWISE_BIT != 0,
    })
}

/// Verify that a member-decode routine consumed exactly the bytes its header
/// promised. `start` is the position before the header; `end` the position
/// after the last member.
pub fn check_byte_count(
    class: &str,
    chunk: &Chunk,
    start: u64,
    end: u64,
    expected: Option<u32>,
) -> ObjectResult<()> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let observed = end - start;
    if observed == expected as u64 {
        return Ok(());
    }
    Err(ObjectError::Deserialization {
        class: class.into(),
        expected: expected as u64,
        observed,
        trail: vec![class.into()],
        dump: hex_dump_around(chunk, start, end),
    })
}

/// A hex+ASCII dump of the region around `[start, end)`, for byte-count
/// mismatch diagnostics.
pub fn hex_dump_around(chunk: &Chunk, start: u64, end: u64) -> String {
    const CONTEXT: u64 = 32;
    const WIDTH: u64 = 16;

    let lo = start.saturating_sub(CONTEXT).max(chunk.start());
    let hi = (end + CONTEXT).min(chunk.start() + chunk.len() as u64);
    let mut out = String::new();
    let mut pos = lo - lo % WIDTH;
    while pos < hi {
        let row_end = (pos + WIDTH).min(hi);
        let row_start = pos.max(lo);
        out.push_str(&format!("{pos:08x}  "));
        for i in pos..pos + WIDTH {
            if i < row_start || i >= row_end {
                out.push_str("   ");
            } else {
                match chunk.get(i, i + 1) {
                    Ok(b) => out.push_str(&format!("{:02x} ", b[0])),
                    Err(_) => out.push_str("?? "),
                }
            }
        }
        out.push(' ');
        for i in row_start..row_end {
            match chunk.get(i, i + 1) {
                Ok(b) if b[0].is_ascii_graphic() => out.push(b[0] as char),
                Ok(_) => out.push('.'),
                Err(_) => out.push('?'),
            }
        }
        out.push('\n');
        pos += WIDTH;
    }
    out
}
