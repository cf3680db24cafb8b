//! Records into generic maps.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{HookError, HookResult};
use crate::hook::{Hook, Target, join_path};
use crate::shape::Shape;
use crate::value::Value;

/// Turn a record into a map when the destination is untyped.
///
/// Fires for a [`Value::Record`] source and a destination of
/// [`Shape::Any`] or `map<any>`. Each field is decoded again through the
/// calling decoder with an untyped destination, so nested records become
/// nested maps. Every other pair passes through, which leaves a record
/// aimed at a sequence for the decoder to reject.
#[must_use]
pub fn recursive_struct_to_map_hook() -> Hook {
    Hook::from_values(struct_to_map).named("recursive_struct_to_map_hook")
}

fn accepts_map(shape: &Shape) -> bool {
    match shape {
        Shape::Any => true,
        Shape::Map(elem) => **elem == Shape::Any,
        _ => false,
    }
}

fn struct_to_map(from: &Value, to: &Target<'_>) -> HookResult<Value> {
    let Value::Record(record) = from else {
        return Ok(from.clone());
    };
    if !accepts_map(to.shape()) {
        return Ok(from.clone());
    }

    let depth = to.depth().saturating_add(1);
    if depth > to.max_depth() {
        warn!(
            field = to.name(),
            depth,
            max_depth = to.max_depth(),
            "struct-to-map recursion limit reached"
        );
        return Err(HookError::DepthExceeded {
            max: to.max_depth(),
        });
    }

    let any = Shape::Any;
    let mut map = BTreeMap::new();
    for (key, value) in record.fields() {
        let path = join_path(to.name(), key);
        let converted = match to.reentry() {
            Some(decoder) => decoder.reenter(&path, value, &any, depth)?,
            None => struct_to_map(
                value,
                &to.with_shape(&any).with_name(&path).with_depth(depth),
            )?,
        };
        map.insert(key.to_owned(), converted);
    }
    Ok(Value::Map(map))
}
