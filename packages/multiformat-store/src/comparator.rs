//! Canonical ordering of serialized nodes.
//!
//! Used to sort every array the flattener emits so output does not depend on
//! store iteration order, and by tests to compare documents.

use std::cmp::Ordering;

use spdx_core_store::vocab::{
    PROP_EXTERNAL_DOCUMENT_ID, PROP_EXTERNAL_SPDX_DOCUMENT, PROP_LICENSE_ID,
    PROP_REFERENCE_CATEGORY, PROP_REFERENCE_LOCATOR, PROP_REFERENCE_TYPE, SPDX_IDENTIFIER,
};
use spdx_core_store::{Map, Value};

/// Identifying field groups, in priority order. The first group present on
/// both sides decides the order.
const IDENTIFYING_FIELDS: &[&[&str]] = &[
    &[SPDX_IDENTIFIER],
    &[PROP_LICENSE_ID],
    &[PROP_EXTERNAL_SPDX_DOCUMENT, PROP_EXTERNAL_DOCUMENT_ID],
    &[
        PROP_REFERENCE_CATEGORY,
        PROP_REFERENCE_TYPE,
        PROP_REFERENCE_LOCATOR,
    ],
];

fn rank(value: &Value) -> u8 {
    match value {
        Value::String(_) => 0,
        Value::Map(_) => 1,
        Value::Array(_) => 2,
        Value::Bool(_) => 3,
        Value::Integer(_) | Value::Float(_) => 4,
        Value::Null => 5,
    }
}

/// Total order over serialized nodes.
///
/// - null sorts after everything else
/// - strings sort before objects, objects before arrays
/// - objects compare by their identifying fields when both carry the same
///   group, otherwise field by field in name order
/// - arrays compare by length, then element-wise after sorting
pub fn compare_nodes(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Map(x), Value::Map(y)) => compare_maps(x, y),
        (Value::Array(x), Value::Array(y)) => compare_arrays(x, y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.total_cmp(y),
        (Value::Integer(x), Value::Float(y)) => (*x as f64).total_cmp(y).then(Ordering::Less),
        (Value::Float(x), Value::Integer(y)) => x.total_cmp(&(*y as f64)).then(Ordering::Greater),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn compare_maps(a: &Map, b: &Map) -> Ordering {
    for group in IDENTIFYING_FIELDS {
        let present = group
            .iter()
            .all(|field| a.contains_key(*field) && b.contains_key(*field));
        if !present {
            continue;
        }
        for field in group.iter() {
            let ord = compare_nodes(&a[*field], &b[*field]);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        break;
    }
    compare_all_fields(a, b)
}

fn compare_all_fields(a: &Map, b: &Map) -> Ordering {
    let mut a_fields: Vec<(&String, &Value)> = a.iter().collect();
    let mut b_fields: Vec<(&String, &Value)> = b.iter().collect();
    a_fields.sort_by(|x, y| x.0.cmp(y.0));
    b_fields.sort_by(|x, y| x.0.cmp(y.0));

    for ((a_name, a_value), (b_name, b_value)) in a_fields.iter().zip(b_fields.iter()) {
        let ord = a_name
            .cmp(b_name)
            .then_with(|| compare_nodes(a_value, b_value));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a_fields.len().cmp(&b_fields.len())
}

fn compare_arrays(a: &[Value], b: &[Value]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        let mut a_sorted: Vec<&Value> = a.iter().collect();
        let mut b_sorted: Vec<&Value> = b.iter().collect();
        a_sorted.sort_by(|x, y| compare_nodes(x, y));
        b_sorted.sort_by(|x, y| compare_nodes(x, y));
        a_sorted
            .iter()
            .zip(b_sorted.iter())
            .map(|(x, y)| compare_nodes(x, y))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    })
}

/// Sort a list of nodes into canonical order.
pub fn sort_nodes(values: &mut [Value]) {
    values.sort_by(compare_nodes);
}

/// Check whether two trees are equal once every array is put into
/// canonical order and field order is ignored.
pub fn canonically_equal(a: &Value, b: &Value) -> bool {
    compare_nodes(a, b) == Ordering::Equal
}
