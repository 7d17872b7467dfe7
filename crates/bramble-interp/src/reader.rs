use std::sync::Arc;

use bramble_bytes::{Chunk, Cursor};
use bramble_object::{check_byte_count, read_numbytes_version, BYTE_COUNT_MASK};

use crate::compile::CompiledPlan;
use crate::error::{InterpError, InterpResult};
use crate::plan::{Member, Plan, PlanId, PrimKind};
use crate::raw::{PrimBuffer, RawColumn};

/// A stateful reader instance built from one plan node.
///
/// `read` consumes exactly one logical entry's worth of bytes and appends to
/// this reader's own buffers; `drain` snapshots the accumulated columnar
/// data without resetting anything. One reader tree serves one
/// (branch, basket) parse and is never shared across threads.
#[derive(Debug)]
pub enum Reader {
    Primitive(PrimReader),
    Sequence(SequenceReader),
    Map(MapReader),
    DynString(StringReader),
    FixedNumArray(NumArrayReader),
    FixedString(StringReader),
    PolyBase,
    CArray(CArrayReader),
    Base(RecordReader),
    Object(RecordReader),
    Empty,
}

impl Reader {
    pub fn new(plan: &Arc<CompiledPlan>, id: PlanId) -> Self {
        match plan.arena().get(id) {
            Plan::Primitive(kind) => Self::Primitive(PrimReader {
                buf: PrimBuffer::new(*kind),
            }),
            Plan::Sequence { item, top_level } => Self::Sequence(SequenceReader {
                top_level: *top_level,
                counts: Vec::new(),
                item: Box::new(Self::new(plan, *item)),
            }),
            Plan::AssocMap {
                key,
                value,
                top_level,
            } => Self::Map(MapReader {
                top_level: *top_level,
                counts: Vec::new(),
                key: Box::new(Self::new(plan, *key)),
                value: Box::new(Self::new(plan, *value)),
            }),
            Plan::DynString { top_level } => Self::DynString(StringReader {
                header: *top_level,
                counts: Vec::new(),
                data: Vec::new(),
            }),
            Plan::FixedNumArray(kind) => Self::FixedNumArray(NumArrayReader {
                counts: Vec::new(),
                buf: PrimBuffer::new(*kind),
            }),
            Plan::FixedString => Self::FixedString(StringReader {
                header: false,
                counts: Vec::new(),
                data: Vec::new(),
            }),
            Plan::PolyBaseMarker => Self::PolyBase,
            Plan::FixedCArray {
                item,
                flat,
                item_has_header,
                ..
            } => Self::CArray(CArrayReader {
                flat: *flat,
                item_has_header: *item_has_header,
                item: Box::new(Self::new(plan, *item)),
            }),
            Plan::BaseObject { class, members } => {
                Self::Base(RecordReader::new(plan, class, members, false))
            }
            Plan::ObjectHeader { class, members } => {
                Self::Object(RecordReader::new(plan, class, members, true))
            }
            Plan::Empty => Self::Empty,
        }
    }

    /// Consume one entry. All-or-nothing: on error the buffers may hold a
    /// partial entry and the whole parse must be abandoned.
    pub fn read(&mut self, chunk: &Chunk, cursor: &mut Cursor) -> InterpResult<()> {
        match self {
            Self::Primitive(r) => Ok(r.buf.read_one(chunk, cursor)?),
            Self::Sequence(r) => r.read(chunk, cursor),
            Self::Map(r) => r.read(chunk, cursor),
            Self::DynString(r) | Self::FixedString(r) => r.read(chunk, cursor),
            Self::FixedNumArray(r) => r.read(chunk, cursor),
            Self::PolyBase => {
                // Version, unique-id, bit-flags; nothing worth keeping.
                cursor.read_u16(chunk)?;
                cursor.read_u32(chunk)?;
                cursor.read_u32(chunk)?;
                Ok(())
            }
            Self::CArray(r) => r.read(chunk, cursor),
            Self::Base(r) => r.read_base(chunk, cursor),
            Self::Object(r) => r.read_object(chunk, cursor),
            Self::Empty => Ok(()),
        }
    }

    /// Snapshot the accumulated raw columnar data.
    pub fn drain(&self) -> RawColumn {
        match self {
            Self::Primitive(r) => RawColumn::Primitive(r.buf.clone()),
            Self::Sequence(r) => RawColumn::Jagged {
                counts: r.counts.clone(),
                content: Box::new(r.item.drain()),
            },
            Self::Map(r) => RawColumn::Pairs {
                counts: r.counts.clone(),
                keys: Box::new(r.key.drain()),
                values: Box::new(r.value.drain()),
            },
            Self::DynString(r) | Self::FixedString(r) => RawColumn::Bytes {
                counts: r.counts.clone(),
                data: r.data.clone(),
            },
            Self::FixedNumArray(r) => RawColumn::Jagged {
                counts: r.counts.clone(),
                content: Box::new(RawColumn::Primitive(r.buf.clone())),
            },
            Self::PolyBase | Self::Empty => RawColumn::Empty,
            Self::CArray(r) => r.item.drain(),
            Self::Base(r) | Self::Object(r) => RawColumn::Record {
                fields: r
                    .members
                    .iter()
                    .map(|m| {
                        let raw = m
                            .reader
                            .as_ref()
                            .map(|r| r.drain())
                            .unwrap_or(RawColumn::Empty);
                        (m.name.clone(), raw)
                    })
                    .collect(),
            },
        }
    }
}

#[derive(Debug)]
pub struct PrimReader {
    buf: PrimBuffer,
}

#[derive(Debug)]
pub struct SequenceReader {
    top_level: bool,
    counts: Vec<u64>,
    item: Box<Reader>,
}

impl SequenceReader {
    fn read(&mut self, chunk: &Chunk, cursor: &mut Cursor) -> InterpResult<()> {
        if self.top_level {
            let header = read_numbytes_version(chunk, cursor)?;
            if header.is_memberwise {
                return Err(InterpError::MemberWise {
                    class: "vector".into(),
                });
            }
        }
        let n = cursor.read_u32(chunk)? as u64;
        self.counts.push(n);
        for _ in 0..n {
            self.item.read(chunk, cursor)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct MapReader {
    top_level: bool,
    counts: Vec<u64>,
    key: Box<Reader>,
    value: Box<Reader>,
}

impl MapReader {
    fn read(&mut self, chunk: &Chunk, cursor: &mut Cursor) -> InterpResult<()> {
        if self.top_level {
            let header = read_numbytes_version(chunk, cursor)?;
            if header.is_memberwise {
                return Err(InterpError::MemberWise {
                    class: "map".into(),
                });
            }
            // Undocumented 8-byte field carried by top-level maps; purpose
            // unknown, reproduced as a skip. See DESIGN.md before touching.
            cursor.skip(8);
            let n = cursor.read_u32(chunk)? as u64;
            self.counts.push(n);
            for _ in 0..n {
                self.key.read(chunk, cursor)?;
            }
            for _ in 0..n {
                self.value.read(chunk, cursor)?;
            }
        } else {
            let n = cursor.read_u32(chunk)? as u64;
            self.counts.push(n);
            for _ in 0..n {
                self.key.read(chunk, cursor)?;
                self.value.read(chunk, cursor)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct StringReader {
    header: bool,
    counts: Vec<u64>,
    data: Vec<u8>,
}

impl StringReader {
    fn read(&mut self, chunk: &Chunk, cursor: &mut Cursor) -> InterpResult<()> {
        if self.header {
            read_numbytes_version(chunk, cursor)?;
        }
        let bytes = cursor.read_string(chunk)?;
        self.counts.push(bytes.len() as u64);
        self.data.extend_from_slice(bytes);
        Ok(())
    }
}

#[derive(Debug)]
pub struct NumArrayReader {
    counts: Vec<u64>,
    buf: PrimBuffer,
}

impl NumArrayReader {
    fn read(&mut self, chunk: &Chunk, cursor: &mut Cursor) -> InterpResult<()> {
        let n = cursor.read_u32(chunk)? as u64;
        self.counts.push(n);
        for _ in 0..n {
            self.buf.read_one(chunk, cursor)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct CArrayReader {
    flat: u32,
    item_has_header: bool,
    item: Box<Reader>,
}

impl CArrayReader {
    fn read(&mut self, chunk: &Chunk, cursor: &mut Cursor) -> InterpResult<()> {
        if self.item_has_header {
            read_numbytes_version(chunk, cursor)?;
        }
        for _ in 0..self.flat {
            self.item.read(chunk, cursor)?;
        }
        Ok(())
    }
}

/// Shared shape of base-object and whole-object readers.
///
/// Member readers instantiate on first use so that plan graphs with
/// back-edges (recursive classes) build finite reader trees: recursion only
/// materializes as deep as the data actually nests.
#[derive(Debug)]
pub struct RecordReader {
    plan: Arc<CompiledPlan>,
    class: String,
    members: Vec<MemberSlot>,
    /// Whether the wire carries the class-tag/classname prologue.
    with_prologue: bool,
}

#[derive(Debug)]
struct MemberSlot {
    name: String,
    plan: PlanId,
    reader: Option<Box<Reader>>,
}

impl RecordReader {
    fn new(plan: &Arc<CompiledPlan>, class: &str, members: &[Member], with_prologue: bool) -> Self {
        Self {
            plan: Arc::clone(plan),
            class: class.to_string(),
            members: members
                .iter()
                .map(|m| MemberSlot {
                    name: m.name.clone(),
                    plan: m.plan,
                    reader: None,
                })
                .collect(),
            with_prologue,
        }
    }

    fn read_members(&mut self, chunk: &Chunk, cursor: &mut Cursor) -> InterpResult<()> {
        let plan = &self.plan;
        for slot in &mut self.members {
            let id = slot.plan;
            let reader = slot
                .reader
                .get_or_insert_with(|| Box::new(Reader::new(plan, id)));
            reader
                .read(chunk, cursor)
                .map_err(|e| breadcrumb(e, &slot.name))?;
        }
        Ok(())
    }

    /// Base-class entry: byte-count/version header, then members in order.
    fn read_base(&mut self, chunk: &Chunk, cursor: &mut Cursor) -> InterpResult<()> {
        let start = cursor.index();
        let header = read_numbytes_version(chunk, cursor)?;
        self.read_members(chunk, cursor)?;
        check_byte_count(&self.class, chunk, start, cursor.index(), header.num_bytes)?;
        Ok(())
    }

    /// Whole object: byte count, class tag (`-1` means a classname string
    /// follows, read and discarded), byte-count/version, then members.
    fn read_object(&mut self, chunk: &Chunk, cursor: &mut Cursor) -> InterpResult<()> {
        let start = cursor.index();
        let mut expected = None;
        if self.with_prologue {
            let probe = cursor.read_u32(chunk)?;
            if probe & BYTE_COUNT_MASK != 0 {
                expected = Some((probe & !BYTE_COUNT_MASK) + 4);
            }
            let tag = cursor.read_i32(chunk)?;
            if tag == -1 {
                cursor.read_c_string(chunk)?;
            }
        }
        read_numbytes_version(chunk, cursor)?;
        self.read_members(chunk, cursor)?;
        check_byte_count(&self.class, chunk, start, cursor.index(), expected)?;
        Ok(())
    }
}

fn breadcrumb(err: InterpError, frame: &str) -> InterpError {
    match err {
        InterpError::Object(e) => InterpError::Object(e.breadcrumb(frame)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bramble_meta::{ElementDescriptor, MetadataMap};
    use bramble_object::MEMBERWISE_BIT;

    fn plan_for(type_name: &str) -> Arc<CompiledPlan> {
        let elem = ElementDescriptor::value("col", type_name);
        Arc::new(CompiledPlan::for_element(&elem, &MetadataMap::new()).unwrap())
    }

    fn header(num_bytes: u32, version: u16) -> Vec<u8> {
        let mut wire = (BYTE_COUNT_MASK | num_bytes).to_be_bytes().to_vec();
        wire.extend_from_slice(&version.to_be_bytes());
        wire
    }

    /// Wire for one entry of a top-level vector<i32>.
    fn vector_entry(values: &[i32]) -> Vec<u8> {
        let body = 2 + 4 + 4 * values.len() as u32; // version + count + items
        let mut wire = header(body, 1);
        wire.extend_from_slice(&(values.len() as u32).to_be_bytes());
        for v in values {
            wire.extend_from_slice(&v.to_be_bytes());
        }
        wire
    }

    #[test]
    fn sequence_of_ints_three_entries() {
        // [[1], [1,2], [1,2,3]] -> counts [1,2,3], content [1,1,2,1,2,3]
        let mut wire = Vec::new();
        wire.extend(vector_entry(&[1]));
        wire.extend(vector_entry(&[1, 2]));
        wire.extend(vector_entry(&[1, 2, 3]));
        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);

        let plan = plan_for("vector<int>");
        let mut reader = Reader::new(&plan, plan.root());
        for _ in 0..3 {
            reader.read(&chunk, &mut cursor).unwrap();
        }

        match reader.drain() {
            RawColumn::Jagged { counts, content } => {
                assert_eq!(counts, vec![1, 2, 3]);
                assert_eq!(
                    *content,
                    RawColumn::Primitive(PrimBuffer::I32(vec![1, 1, 2, 1, 2, 3]))
                );
            }
            other => panic!("unexpected raw column: {other:?}"),
        }
    }

    #[test]
    fn memberwise_sequence_is_rejected() {
        let mut wire = (BYTE_COUNT_MASK | 10).to_be_bytes().to_vec();
        wire.extend_from_slice(&(MEMBERWISE_BIT | 1).to_be_bytes());
        wire.extend_from_slice(&0u32.to_be_bytes());
        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);

        let plan = plan_for("vector<int>");
        let mut reader = Reader::new(&plan, plan.root());
        assert!(matches!(
            reader.read(&chunk, &mut cursor),
            Err(InterpError::MemberWise { .. })
        ));
    }

    #[test]
    fn memberwise_map_is_rejected() {
        let mut wire = (BYTE_COUNT_MASK | 10).to_be_bytes().to_vec();
        wire.extend_from_slice(&(MEMBERWISE_BIT | 1).to_be_bytes());
        wire.extend_from_slice(&[0u8; 12]);
        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);

        let plan = plan_for("map<int,int>");
        let mut reader = Reader::new(&plan, plan.root());
        assert!(matches!(
            reader.read(&chunk, &mut cursor),
            Err(InterpError::MemberWise { .. })
        ));
    }

    #[test]
    fn nested_sequence_has_no_inner_header() {
        // One entry of vector<vector<int>>: [[5, 6], [7]]
        let mut body = Vec::new();
        body.extend_from_slice(&2u32.to_be_bytes()); // outer count
        body.extend_from_slice(&2u32.to_be_bytes()); // inner count
        body.extend_from_slice(&5i32.to_be_bytes());
        body.extend_from_slice(&6i32.to_be_bytes());
        body.extend_from_slice(&1u32.to_be_bytes()); // inner count
        body.extend_from_slice(&7i32.to_be_bytes());
        let mut wire = header(2 + body.len() as u32, 1);
        wire.extend(body);

        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);
        let plan = plan_for("vector<vector<int>>");
        let mut reader = Reader::new(&plan, plan.root());
        reader.read(&chunk, &mut cursor).unwrap();

        match reader.drain() {
            RawColumn::Jagged { counts, content } => {
                assert_eq!(counts, vec![2]);
                match *content {
                    RawColumn::Jagged {
                        counts: inner_counts,
                        content: inner,
                    } => {
                        assert_eq!(inner_counts, vec![2, 1]);
                        assert_eq!(
                            *inner,
                            RawColumn::Primitive(PrimBuffer::I32(vec![5, 6, 7]))
                        );
                    }
                    other => panic!("unexpected inner: {other:?}"),
                }
            }
            other => panic!("unexpected raw column: {other:?}"),
        }
    }

    #[test]
    fn top_level_map_keys_then_values_with_unknown_field() {
        // One entry of map<int, float> with two pairs.
        let mut body = Vec::new();
        body.extend_from_slice(&[0u8; 8]); // the undocumented field
        body.extend_from_slice(&2u32.to_be_bytes());
        body.extend_from_slice(&1i32.to_be_bytes());
        body.extend_from_slice(&2i32.to_be_bytes());
        body.extend_from_slice(&1.5f32.to_be_bytes());
        body.extend_from_slice(&2.5f32.to_be_bytes());
        let mut wire = header(2 + body.len() as u32, 1);
        wire.extend(body);

        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);
        let plan = plan_for("map<int, float>");
        let mut reader = Reader::new(&plan, plan.root());
        reader.read(&chunk, &mut cursor).unwrap();

        match reader.drain() {
            RawColumn::Pairs {
                counts,
                keys,
                values,
            } => {
                assert_eq!(counts, vec![2]);
                assert_eq!(*keys, RawColumn::Primitive(PrimBuffer::I32(vec![1, 2])));
                assert_eq!(
                    *values,
                    RawColumn::Primitive(PrimBuffer::F32(vec![1.5, 2.5]))
                );
            }
            other => panic!("unexpected raw column: {other:?}"),
        }
    }

    #[test]
    fn nested_map_interleaves_pairs() {
        // vector<map<int,int>> with one map of two pairs, interleaved.
        let mut body = Vec::new();
        body.extend_from_slice(&1u32.to_be_bytes()); // vector count
        body.extend_from_slice(&2u32.to_be_bytes()); // map count
        body.extend_from_slice(&1i32.to_be_bytes()); // k
        body.extend_from_slice(&10i32.to_be_bytes()); // v
        body.extend_from_slice(&2i32.to_be_bytes()); // k
        body.extend_from_slice(&20i32.to_be_bytes()); // v
        let mut wire = header(2 + body.len() as u32, 1);
        wire.extend(body);

        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);
        let plan = plan_for("vector<map<int,int>>");
        let mut reader = Reader::new(&plan, plan.root());
        reader.read(&chunk, &mut cursor).unwrap();

        match reader.drain() {
            RawColumn::Jagged { content, .. } => match *content {
                RawColumn::Pairs { counts, keys, values } => {
                    assert_eq!(counts, vec![2]);
                    assert_eq!(*keys, RawColumn::Primitive(PrimBuffer::I32(vec![1, 2])));
                    assert_eq!(*values, RawColumn::Primitive(PrimBuffer::I32(vec![10, 20])));
                }
                other => panic!("unexpected content: {other:?}"),
            },
            other => panic!("unexpected raw column: {other:?}"),
        }
    }

    #[test]
    fn strings_accumulate_counts_and_bytes() {
        let plan = plan_for("TString");
        let mut reader = Reader::new(&plan, plan.root());

        let mut wire = vec![2, b'h', b'i'];
        wire.extend_from_slice(&[5, b'w', b'o', b'r', b'l', b'd']);
        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);
        reader.read(&chunk, &mut cursor).unwrap();
        reader.read(&chunk, &mut cursor).unwrap();

        match reader.drain() {
            RawColumn::Bytes { counts, data } => {
                assert_eq!(counts, vec![2, 5]);
                assert_eq!(data, b"hiworld");
            }
            other => panic!("unexpected raw column: {other:?}"),
        }
    }

    #[test]
    fn fixed_num_array_container() {
        let plan = plan_for("TArrayD");
        let mut reader = Reader::new(&plan, plan.root());

        let mut wire = 3u32.to_be_bytes().to_vec();
        for v in [1.0f64, 2.0, 3.0] {
            wire.extend_from_slice(&v.to_be_bytes());
        }
        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);
        reader.read(&chunk, &mut cursor).unwrap();

        match reader.drain() {
            RawColumn::Jagged { counts, content } => {
                assert_eq!(counts, vec![3]);
                assert_eq!(
                    *content,
                    RawColumn::Primitive(PrimBuffer::F64(vec![1.0, 2.0, 3.0]))
                );
            }
            other => panic!("unexpected raw column: {other:?}"),
        }
    }

    #[test]
    fn c_array_reads_flat_repetitions() {
        let elem = ElementDescriptor::array("m", "double", &[2, 3]);
        let plan = Arc::new(CompiledPlan::for_element(&elem, &MetadataMap::new()).unwrap());
        let mut reader = Reader::new(&plan, plan.root());

        let mut wire = Vec::new();
        for v in 0..6 {
            wire.extend_from_slice(&(v as f64).to_be_bytes());
        }
        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);
        reader.read(&chunk, &mut cursor).unwrap();
        assert_eq!(cursor.index(), 48);

        match reader.drain() {
            RawColumn::Primitive(PrimBuffer::F64(values)) => {
                assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
            }
            other => panic!("unexpected raw column: {other:?}"),
        }
    }

    #[test]
    fn object_with_base_chain_and_byte_counts() {
        let mut metadata = MetadataMap::new();
        metadata.insert(
            "Particle",
            vec![
                ElementDescriptor::base("Kinematic", 0),
                ElementDescriptor::value("charge", "int"),
            ],
        );
        metadata.insert(
            "Kinematic",
            vec![
                ElementDescriptor::value("px", "float"),
                ElementDescriptor::value("py", "float"),
            ],
        );
        let plan = Arc::new(CompiledPlan::for_class("Particle", &metadata).unwrap());
        let mut reader = Reader::new(&plan, plan.root());

        // Base payload: header(2+8) + px + py
        let mut base = header(2 + 8, 2);
        base.extend_from_slice(&1.0f32.to_be_bytes());
        base.extend_from_slice(&2.0f32.to_be_bytes());

        // Object: bcnt + tag(0, no classname) + header + base + charge
        let mut body = 0i32.to_be_bytes().to_vec(); // class tag
        body.extend(header(2 + (base.len() + 4) as u32, 3));
        body.extend(base);
        body.extend_from_slice(&(-1i32).to_be_bytes());
        let mut wire = (BYTE_COUNT_MASK | body.len() as u32).to_be_bytes().to_vec();
        wire.extend(body);

        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);
        reader.read(&chunk, &mut cursor).unwrap();
        assert_eq!(cursor.index() as usize, chunk.len());

        match reader.drain() {
            RawColumn::Record { fields } => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].0, "Kinematic");
                match &fields[0].1 {
                    RawColumn::Record { fields: base_fields } => {
                        assert_eq!(
                            base_fields[0].1,
                            RawColumn::Primitive(PrimBuffer::F32(vec![1.0]))
                        );
                        assert_eq!(
                            base_fields[1].1,
                            RawColumn::Primitive(PrimBuffer::F32(vec![2.0]))
                        );
                    }
                    other => panic!("unexpected base column: {other:?}"),
                }
                assert_eq!(
                    fields[1].1,
                    RawColumn::Primitive(PrimBuffer::I32(vec![-1]))
                );
            }
            other => panic!("unexpected raw column: {other:?}"),
        }
    }

    #[test]
    fn object_byte_count_mismatch_is_fatal_with_breadcrumbs() {
        let mut metadata = MetadataMap::new();
        metadata.insert(
            "Short",
            vec![ElementDescriptor::value("x", "int")],
        );
        let plan = Arc::new(CompiledPlan::for_class("Short", &metadata).unwrap());
        let mut reader = Reader::new(&plan, plan.root());

        // Promise more bytes than the members consume.
        let mut body = 0i32.to_be_bytes().to_vec();
        body.extend(header(2 + 4, 1));
        body.extend_from_slice(&5i32.to_be_bytes());
        let mut wire = (BYTE_COUNT_MASK | (body.len() as u32 + 6)).to_be_bytes().to_vec();
        wire.extend(body);
        wire.extend_from_slice(&[0; 16]); // padding so the dump has bytes

        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);
        let err = reader.read(&chunk, &mut cursor).unwrap_err();
        match err {
            InterpError::Object(bramble_object::ObjectError::Deserialization {
                class,
                expected,
                observed,
                ..
            }) => {
                assert_eq!(class, "Short");
                assert_eq!(expected, observed + 6);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn poly_base_discards_ten_bytes() {
        let elem = ElementDescriptor::base("PolyBase", bramble_meta::POLYMORPHIC_BASE_TAG);
        let plan = Arc::new(CompiledPlan::for_element(&elem, &MetadataMap::new()).unwrap());
        let mut reader = Reader::new(&plan, plan.root());

        let chunk = Chunk::from_vec(vec![0xAB; 12]);
        let mut cursor = Cursor::new(0);
        reader.read(&chunk, &mut cursor).unwrap();
        assert_eq!(cursor.index(), 10);
        assert_eq!(reader.drain(), RawColumn::Empty);
    }

    #[test]
    fn recursive_class_reads_as_deep_as_the_data() {
        let mut metadata = MetadataMap::new();
        metadata.insert(
            "Node",
            vec![
                ElementDescriptor::value("value", "int"),
                ElementDescriptor::value("tail", "vector<Node>"),
            ],
        );
        let plan = Arc::new(CompiledPlan::for_class("Node", &metadata).unwrap());
        let mut reader = Reader::new(&plan, plan.root());

        // Node { value: 1, tail: [Node { value: 2, tail: [] }] }
        let mut leaf_body = 0i32.to_be_bytes().to_vec();
        leaf_body.extend(header(2 + 4 + 4, 1));
        leaf_body.extend_from_slice(&2i32.to_be_bytes());
        leaf_body.extend_from_slice(&0u32.to_be_bytes()); // empty tail
        let mut leaf = (BYTE_COUNT_MASK | leaf_body.len() as u32).to_be_bytes().to_vec();
        leaf.extend(leaf_body);

        let mut root_body = 0i32.to_be_bytes().to_vec();
        root_body.extend(header(2 + 4 + 4 + leaf.len() as u32, 1));
        root_body.extend_from_slice(&1i32.to_be_bytes());
        root_body.extend_from_slice(&1u32.to_be_bytes()); // one tail node
        root_body.extend(leaf);
        let mut wire = (BYTE_COUNT_MASK | root_body.len() as u32).to_be_bytes().to_vec();
        wire.extend(root_body);

        let chunk = Chunk::from_vec(wire);
        let mut cursor = Cursor::new(0);
        reader.read(&chunk, &mut cursor).unwrap();
        assert_eq!(cursor.index() as usize, chunk.len());

        let RawColumn::Record { fields } = reader.drain() else {
            panic!("expected record");
        };
        assert_eq!(
            fields[0].1,
            RawColumn::Primitive(PrimBuffer::I32(vec![1]))
        );
        let RawColumn::Jagged { counts, content } = &fields[1].1 else {
            panic!("expected jagged tail");
        };
        assert_eq!(counts, &[1]);
        let RawColumn::Record { fields: leaf_fields } = content.as_ref() else {
            panic!("expected leaf record");
        };
        assert_eq!(
            leaf_fields[0].1,
            RawColumn::Primitive(PrimBuffer::I32(vec![2]))
        );
    }
}
