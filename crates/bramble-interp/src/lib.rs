//! Streamer-metadata-driven column interpretation for the bramble reader.
//!
//! Given an element descriptor (or a whole class) and the file's streamer
//! metadata, this crate compiles a [`Plan`] graph describing how each entry
//! is laid out on the wire, instantiates a [`Reader`] tree that accumulates
//! typed buffers while consuming entries, and finally reshapes the drained
//! buffers into a [`ColumnValue`] with cumulative offsets.
//!
//! Compilation is a fixed sequence of matcher rules tried in priority order;
//! a rule that does not recognize the type declines rather than erroring, so
//! failure to match anything surfaces as one [`InterpError::NoRule`] naming
//! the dotted member path. Plans are immutable and shareable; reader trees
//! are cheap, per-parse, and instantiate recursive members lazily so cyclic
//! class graphs stay finite.

pub mod branch;
pub mod cache;
pub mod compile;
pub mod error;
pub mod plan;
pub mod raw;
pub mod reader;
pub mod reconstruct;

pub use branch::BranchReader;
pub use cache::PlanCache;
pub use compile::CompiledPlan;
pub use error::{InterpError, InterpResult};
pub use plan::{Member, Plan, PlanArena, PlanId, PrimKind};
pub use raw::{PrimBuffer, RawColumn};
pub use reader::Reader;
pub use reconstruct::{cumulate, reconstruct, ColumnValue};
