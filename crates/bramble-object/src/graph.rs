use tracing::debug;

use bramble_bytes::{Chunk, Cursor};

use crate::error::{ObjectError, ObjectResult};
use crate::header::{BYTE_COUNT_MASK, CLASS_REF_MASK, NEW_CLASS_TAG, REF_KEY_OFFSET};
use crate::refs::{RefItem, RefTable};
use crate::resolve::{ClassResolver, ObjectHandle};

/// Read one polymorphic, possibly back-referenced object.
///
/// The wire starts with a 4-byte probe that is either a byte count (marker
/// bit set) followed by a 4-byte tag, or the tag itself. The tag then
/// selects one of three shapes:
///
/// - masked low bits all zero: a *reference*. `0` is null, `1` is the
///   caller-supplied parent, anything else keys into the reference table; a
///   key that was never materialized skips the encoded byte count and yields
///   `None`.
/// - the new-class sentinel: a NUL-terminated class name follows; the class
///   is resolved, registered, and asked to decode a fresh object, which is
///   registered in turn.
/// - otherwise: a back-reference to an already-registered *class*, decoding
///   a fresh object of that class.
///
/// Table keys are displacements relative to the chunk origin plus a fixed
/// offset, matching what the writer computed when it serialized the graph.
pub fn read_object_any(
    chunk: &Chunk,
    cursor: &mut Cursor,
    refs: &mut RefTable,
    resolver: &dyn ClassResolver,
    parent: Option<&ObjectHandle>,
) -> ObjectResult<Option<ObjectHandle>> {
    let beg = cursor.displacement();
    let probe = cursor.read_u32(chunk)?;

    let (tag, num_bytes, class_key_pos) = if probe & BYTE_COUNT_MASK == 0 || probe == NEW_CLASS_TAG
    {
        (probe, None, 0)
    } else {
        let start = cursor.displacement();
        let tag = cursor.read_u32(chunk)?;
        (tag, Some(probe & !BYTE_COUNT_MASK), start)
    };

    if tag & CLASS_REF_MASK == 0 {
        // Not an instance: a reference to something already decoded.
        if tag == 0 {
            return Ok(None);
        }
        if tag == 1 {
            return Ok(parent.cloned());
        }
        if let Some(RefItem::Object(obj)) = refs.get(tag as u64) {
            return Ok(Some(obj.clone()));
        }
        // The referenced object was skipped when it first appeared, so it
        // can only be skipped again.
        match num_bytes {
            Some(bcnt) => {
                debug!(tag, bcnt, "reference to unmaterialized object, skipping");
                cursor.move_to(cursor.origin() + beg + bcnt as u64 + 4);
            }
            None => debug!(tag, "reference to unmaterialized object, no byte count to skip"),
        }
        return Ok(None);
    }

    if tag == NEW_CLASS_TAG {
        let name_bytes = cursor.read_c_string(chunk)?;
        let name = String::from_utf8_lossy(name_bytes).into_owned();
        let class = resolver.require(&name)?;

        if num_bytes.is_some() {
            refs.insert(class_key_pos + REF_KEY_OFFSET, RefItem::Class(class.clone()));
        } else {
            refs.insert_sequential(RefItem::Class(class.clone()));
        }

        let object = class.decode(chunk, cursor, refs, resolver)?;
        register_object(refs, num_bytes.is_some(), beg, &object);
        return Ok(Some(object));
    }

    // Back-reference to a class registered earlier in this graph.
    let class_key = (tag & !CLASS_REF_MASK) as u64;
    let class = match refs.get(class_key) {
        Some(RefItem::Class(class)) => class.clone(),
        _ => return Err(ObjectError::UnknownClassReference { tag }),
    };
    let object = class.decode(chunk, cursor, refs, resolver)?;
    register_object(refs, num_bytes.is_some(), beg, &object);
    Ok(Some(object))
}

fn register_object(refs: &mut RefTable, keyed: bool, beg: u64, object: &ObjectHandle) {
    if keyed {
        refs.insert(beg + REF_KEY_OFFSET, RefItem::Object(object.clone()));
    } else {
        refs.insert_sequential(RefItem::Object(object.clone()));
    }
}
