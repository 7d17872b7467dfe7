/// A fixed-width scalar kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimKind {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl PrimKind {
    pub fn width(&self) -> u64 {
        match self {
            Self::Bool | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }
}

/// Index of a plan node inside its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlanId(pub u32);

/// One member of a compiled record plan.
#[derive(Clone, Debug)]
pub struct Member {
    pub name: String,
    pub plan: PlanId,
}

/// A compiled description of how to binary-decode one column shape.
///
/// Plans are immutable after compilation and reused across entries and
/// across threads. Nested plans are addressed by [`PlanId`] into the owning
/// [`PlanArena`], so a class that (transitively) contains itself compiles to
/// a finite graph with back-edges instead of an infinite tree.
#[derive(Clone, Debug)]
pub enum Plan {
    /// A fixed-width scalar.
    Primitive(PrimKind),
    /// Dynamic-size sequence (`vector`-like). Top-level instances carry a
    /// byte-count/version header; nested ones do not.
    Sequence { item: PlanId, top_level: bool },
    /// Associative container. Top-level instances carry a header, an
    /// undocumented 8-byte field, and all keys before all values; nested
    /// instances interleave key,value pairs.
    AssocMap {
        key: PlanId,
        value: PlanId,
        top_level: bool,
    },
    /// Dynamic string (`string` template).
    DynString { top_level: bool },
    /// Legacy fixed-width numeric array container (one class per width).
    FixedNumArray(PrimKind),
    /// Legacy fixed string type; never carries a header.
    FixedString,
    /// The generic polymorphic base: version + unique-id + bit-flags on the
    /// wire, all discarded.
    PolyBaseMarker,
    /// Fixed C-style array with compile-time extents.
    FixedCArray {
        item: PlanId,
        /// Product of all extents; always > 0.
        flat: u32,
        /// Per-dimension extents, outermost first.
        dims: Vec<u32>,
        /// Whether each entry's repetitions are preceded by one
        /// byte-count/version header (object-like items).
        item_has_header: bool,
    },
    /// A base-class chain entry with its own element list.
    BaseObject { class: String, members: Vec<Member> },
    /// A whole object, including the class-tag/classname prologue.
    ObjectHeader { class: String, members: Vec<Member> },
    /// A marker element with no payload.
    Empty,
}

impl Plan {
    /// Whether one instance on the wire starts with a byte-count/version
    /// header of its own.
    pub fn is_header_bearing(&self) -> bool {
        matches!(self, Plan::ObjectHeader { .. } | Plan::BaseObject { .. })
    }
}

/// Arena owning every node of one compiled plan graph.
#[derive(Clone, Debug, Default)]
pub struct PlanArena {
    nodes: Vec<Plan>,
}

impl PlanArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, plan: Plan) -> PlanId {
        let id = PlanId(self.nodes.len() as u32);
        self.nodes.push(plan);
        id
    }

    /// Reserve a slot before its contents are known, for plans that refer
    /// back to themselves. Filled by [`PlanArena::set`].
    pub fn reserve(&mut self) -> PlanId {
        self.push(Plan::Empty)
    }

    pub fn set(&mut self, id: PlanId, plan: Plan) {
        self.nodes[id.0 as usize] = plan;
    }

    pub fn get(&self, id: PlanId) -> &Plan {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
