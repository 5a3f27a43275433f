//! # Priority Merge
//!
//! Recursive, priority-weighted merging of variable mappings, plus the list
//! reorder helper shared by every ordered edge list.
//!
//! The merge is the single precedence mechanism of the engine: it backs both
//! variable batch application (`VarOwner::apply_vars`) and variable
//! propagation to parents on group deletion.

use crate::types::{Priority, RosterError, VarMap};
use serde_json::Value;

/// Merge two variable mappings into a new one.
///
/// Produces the key union of `lhs` and `rhs`. For a key present in both:
/// - two objects merge recursively with the same `prios` (priorities do not
///   change across recursion depth);
/// - two arrays concatenate, `lhs` elements first, both sides cloned;
/// - anything else resolves by priority: the strictly higher side wins and
///   a tie goes to `lhs`.
///
/// `Priority::DROP` on either side makes that whole side participate as the
/// empty mapping. Neither input is mutated; the result shares no state with
/// them.
#[must_use]
pub fn merge_vars(lhs: &VarMap, rhs: &VarMap, prios: (Priority, Priority)) -> VarMap {
    let empty = VarMap::new();
    let lhs = if prios.0 == Priority::DROP { &empty } else { lhs };
    let rhs = if prios.1 == Priority::DROP { &empty } else { rhs };

    let mut merged = VarMap::new();
    for (key, left) in lhs {
        let value = match rhs.get(key) {
            Some(right) => merge_values(left, right, prios),
            None => left.clone(),
        };
        merged.insert(key.clone(), value);
    }
    for (key, right) in rhs {
        if !lhs.contains_key(key) {
            merged.insert(key.clone(), right.clone());
        }
    }
    merged
}

/// Resolve a single key collision.
fn merge_values(left: &Value, right: &Value, prios: (Priority, Priority)) -> Value {
    match (left, right) {
        (Value::Object(lo), Value::Object(ro)) => Value::Object(merge_vars(lo, ro, prios)),
        (Value::Array(la), Value::Array(ra)) => {
            let mut joined = la.clone();
            joined.extend(ra.iter().cloned());
            Value::Array(joined)
        }
        _ => {
            if prios.1.value() > prios.0.value() {
                right.clone()
            } else {
                left.clone()
            }
        }
    }
}

/// Move the element at `old_index` to `new_index`, keeping the relative
/// order of the rest intact.
///
/// Edge lists remember inclusion order, and that order is the tie-break
/// sequence for a later variable flattening; this is the only sanctioned way
/// to change it.
pub fn reorder<T>(list: &mut Vec<T>, old_index: usize, new_index: usize) -> Result<(), RosterError> {
    let len = list.len();
    if old_index >= len {
        return Err(RosterError::IndexOutOfBounds {
            index: old_index,
            len,
        });
    }
    if new_index >= len {
        return Err(RosterError::IndexOutOfBounds {
            index: new_index,
            len,
        });
    }
    let element = list.remove(old_index);
    list.insert(new_index, element);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
