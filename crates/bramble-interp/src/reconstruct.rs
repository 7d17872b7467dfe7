//! Turns drained raw columns into their final columnar shape.

use crate::compile::CompiledPlan;
use crate::error::{InterpError, InterpResult};
use crate::plan::{Plan, PlanId};
use crate::raw::{PrimBuffer, RawColumn};

/// Final columnar value for one column over a run of entries.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnValue {
    Primitive(PrimBuffer),
    /// Variable-length lists addressed by cumulative offsets.
    Jagged {
        offsets: Vec<u64>,
        content: Box<ColumnValue>,
    },
    /// Associative pairs addressed by cumulative offsets.
    Pairs {
        offsets: Vec<u64>,
        keys: Box<ColumnValue>,
        values: Box<ColumnValue>,
    },
    /// Strings as offsets over one flat byte buffer.
    Strings { offsets: Vec<u64>, data: Vec<u8> },
    /// Fixed-extent regular dimension around its content.
    Regular {
        size: u32,
        content: Box<ColumnValue>,
    },
    Record {
        fields: Vec<(String, ColumnValue)>,
    },
    Empty,
}

/// Per-entry counts to cumulative offsets: `n` counts yield `n + 1` offsets,
/// starting at zero and monotonically non-decreasing.
pub fn cumulate(counts: &[u64]) -> Vec<u64> {
    let mut offsets = Vec::with_capacity(counts.len() + 1);
    let mut total = 0u64;
    offsets.push(0);
    for count in counts {
        total += count;
        offsets.push(total);
    }
    offsets
}

/// Reshape one drained raw column per its plan node.
pub fn reconstruct(
    plan: &CompiledPlan,
    id: PlanId,
    raw: RawColumn,
) -> InterpResult<ColumnValue> {
    match (plan.arena().get(id), raw) {
        (Plan::Primitive(_), RawColumn::Primitive(buf)) => Ok(ColumnValue::Primitive(buf)),
        (Plan::Sequence { item, .. }, RawColumn::Jagged { counts, content }) => {
            Ok(ColumnValue::Jagged {
                offsets: cumulate(&counts),
                content: Box::new(reconstruct(plan, *item, *content)?),
            })
        }
        (Plan::AssocMap { key, value, .. }, RawColumn::Pairs { counts, keys, values }) => {
            Ok(ColumnValue::Pairs {
                offsets: cumulate(&counts),
                keys: Box::new(reconstruct(plan, *key, *keys)?),
                values: Box::new(reconstruct(plan, *value, *values)?),
            })
        }
        (Plan::DynString { .. } | Plan::FixedString, RawColumn::Bytes { counts, data }) => {
            Ok(ColumnValue::Strings {
                offsets: cumulate(&counts),
                data,
            })
        }
        (Plan::FixedNumArray(_), RawColumn::Jagged { counts, content }) => {
            let buf = match *content {
                RawColumn::Primitive(buf) => buf,
                other => {
                    return Err(InterpError::ShapeMismatch {
                        expected: "primitive",
                        found: raw_name(&other),
                    })
                }
            };
            Ok(ColumnValue::Jagged {
                offsets: cumulate(&counts),
                content: Box::new(ColumnValue::Primitive(buf)),
            })
        }
        (Plan::FixedCArray { item, dims, .. }, raw) => {
            let mut value = reconstruct(plan, *item, raw)?;
            // Innermost extent wraps first so the outermost dimension ends
            // up outermost in the final shape.
            for size in dims.iter().rev() {
                value = ColumnValue::Regular {
                    size: *size,
                    content: Box::new(value),
                };
            }
            Ok(value)
        }
        (
            Plan::BaseObject { members, .. } | Plan::ObjectHeader { members, .. },
            RawColumn::Record { fields },
        ) => {
            let mut out = Vec::with_capacity(fields.len());
            for (member, (name, raw)) in members.iter().zip(fields) {
                match plan.arena().get(member.plan) {
                    Plan::Empty | Plan::PolyBaseMarker => continue,
                    _ => out.push((name, reconstruct(plan, member.plan, raw)?)),
                }
            }
            Ok(ColumnValue::Record { fields: out })
        }
        (Plan::Empty | Plan::PolyBaseMarker, _) => Ok(ColumnValue::Empty),
        (expected, found) => Err(InterpError::ShapeMismatch {
            expected: plan_name(expected),
            found: raw_name(&found),
        }),
    }
}

fn plan_name(plan: &Plan) -> &'static str {
    match plan {
        Plan::Primitive(_) => "primitive",
        Plan::Sequence { .. } => "sequence",
        Plan::AssocMap { .. } => "map",
        Plan::DynString { .. } | Plan::FixedString => "string",
        Plan::FixedNumArray(_) => "numeric array",
        Plan::PolyBaseMarker => "marker",
        Plan::FixedCArray { .. } => "fixed array",
        Plan::BaseObject { .. } | Plan::ObjectHeader { .. } => "record",
        Plan::Empty => "empty",
    }
}

fn raw_name(raw: &RawColumn) -> &'static str {
    match raw {
        RawColumn::Primitive(_) => "primitive",
        RawColumn::Jagged { .. } => "jagged",
        RawColumn::Pairs { .. } => "pairs",
        RawColumn::Bytes { .. } => "bytes",
        RawColumn::Record { .. } => "record",
        RawColumn::Empty => "empty",
    }
}
