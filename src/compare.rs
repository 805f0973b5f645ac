//! Structural comparison of JSON documents
//!
//! Object key order never matters, array order always does, and numbers
//! compare by value (`1` equals `1.0`).

use serde_json::{Map, Number, Value};
use std::fmt;

/// Deep equality over JSON values
pub fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => number_eq(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| json_eq(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, l)| y.get(key).is_some_and(|r| json_eq(l, r)))
        }
        _ => false,
    }
}

fn number_eq(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    // Mixed i64/u64 that did not match above differ in sign or range
    if !(a.is_f64() || b.is_f64()) {
        return false;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// One point where two documents disagree
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    /// JSONPath-style location, e.g. `$.partitions[1].size`
    pub path: String,
    pub kind: DifferenceKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DifferenceKind {
    Changed { expected: Value, actual: Value },
    Missing { expected: Value },
    Unexpected { actual: Value },
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DifferenceKind::Changed { expected, actual } => {
                write!(f, "{}: expected {}, found {}", self.path, expected, actual)
            }
            DifferenceKind::Missing { expected } => {
                write!(f, "{}: missing (expected {})", self.path, expected)
            }
            DifferenceKind::Unexpected { actual } => {
                write!(f, "{}: unexpected {}", self.path, actual)
            }
        }
    }
}

/// Every difference between `expected` and `actual`, empty when equal
pub fn diff(expected: &Value, actual: &Value) -> Vec<Difference> {
    let mut out = Vec::new();
    diff_at("$".to_string(), expected, actual, &mut out);
    out
}

fn diff_at(path: String, expected: &Value, actual: &Value, out: &mut Vec<Difference>) {
    match (expected, actual) {
        (Value::Object(e), Value::Object(a)) => diff_objects(&path, e, a, out),
        (Value::Array(e), Value::Array(a)) => {
            for (i, (ev, av)) in e.iter().zip(a).enumerate() {
                diff_at(format!("{}[{}]", path, i), ev, av, out);
            }
            for (i, ev) in e.iter().enumerate().skip(a.len()) {
                out.push(Difference {
                    path: format!("{}[{}]", path, i),
                    kind: DifferenceKind::Missing {
                        expected: ev.clone(),
                    },
                });
            }
            for (i, av) in a.iter().enumerate().skip(e.len()) {
                out.push(Difference {
                    path: format!("{}[{}]", path, i),
                    kind: DifferenceKind::Unexpected { actual: av.clone() },
                });
            }
        }
        _ if json_eq(expected, actual) => {}
        _ => out.push(Difference {
            path,
            kind: DifferenceKind::Changed {
                expected: expected.clone(),
                actual: actual.clone(),
            },
        }),
    }
}

fn diff_objects(
    path: &str,
    expected: &Map<String, Value>,
    actual: &Map<String, Value>,
    out: &mut Vec<Difference>,
) {
    for (key, ev) in expected {
        let child = child_path(path, key);
        match actual.get(key) {
            Some(av) => diff_at(child, ev, av, out),
            None => out.push(Difference {
                path: child,
                kind: DifferenceKind::Missing {
                    expected: ev.clone(),
                },
            }),
        }
    }
    for (key, av) in actual {
        if !expected.contains_key(key) {
            out.push(Difference {
                path: child_path(path, key),
                kind: DifferenceKind::Unexpected { actual: av.clone() },
            });
        }
    }
}

fn child_path(parent: &str, key: &str) -> String {
    let plain = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if plain {
        format!("{}.{}", parent, key)
    } else {
        format!("{}[{}]", parent, Value::String(key.to_string()))
    }
}

/// Human-readable mismatch report: the differences, then both documents
pub fn render_mismatch(expected: &Value, actual: &Value) -> String {
    let differences = diff(expected, actual);
    let mut report = format!("{} difference(s):\n", differences.len());
    for d in &differences {
        report.push_str(&format!("  {}\n", d));
    }
    report.push_str(&format!("expected:\n{}\n", pretty(expected)));
    report.push_str(&format!("actual:\n{}", pretty(actual)));
    report
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
