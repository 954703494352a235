//! Deep merge for configuration values.
//!
//! Values are merged field-by-field, later values taking precedence over
//! earlier ones. A zero value (`""`, `false`, `0`, `None`, an empty sequence)
//! in a later value never overrides what an earlier value set.
//!
//! Typed values are merged through their serde data model: every input is
//! encoded into a [`serde_json::Value`] tree, the trees are merged, and the
//! result is decoded back into the first input. Structs and maps both become
//! objects, so the engine only needs to know objects, arrays, null and
//! scalars. Enum values carry their variant tag in the tree, and a later
//! layer choosing another variant replaces the earlier one.
//!
//! Fields skipped by serde keep the first input's value. This holds for the
//! top-level struct and structs nested directly in it; a struct behind an
//! `Option` or another container is rebuilt from the tree.

use super::tree::{self, to_tree, untag_variants};
use crate::error::MergeError;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Merge `values` in order, with later values taking precedence.
///
/// - No values: `T::default()`
/// - One value: returned unchanged
/// - Otherwise: folded left to right with [`deep_merge`] and decoded into
///   the first value
///
/// # Example
/// ```
/// use config_merge::config::{GlobalConfig, Logging, merge};
///
/// let base = GlobalConfig {
///     version: "v1.0.0".into(),
///     time_zone: "UTC".into(),
///     logging: Some(Logging { logger: "glg".into(), level: "info".into(), ..Default::default() }),
/// };
/// let overlay = GlobalConfig {
///     time_zone: "JST".into(),
///     logging: Some(Logging { level: "warn".into(), ..Default::default() }),
///     ..Default::default()
/// };
/// let merged = merge([base, overlay]).unwrap();
/// assert_eq!(merged.version, "v1.0.0");
/// assert_eq!(merged.time_zone, "JST");
/// assert_eq!(merged.logging.unwrap().level, "warn");
/// ```
pub fn merge<T, I>(values: I) -> Result<T, MergeError>
where
    T: Serialize + DeserializeOwned + Default,
    I: IntoIterator<Item = T>,
{
    let mut values = values.into_iter();
    let Some(mut first) = values.next() else {
        return Ok(T::default());
    };
    let Some(second) = values.next() else {
        return Ok(first);
    };

    let mut acc = to_tree(&first).map_err(MergeError::Encode)?;
    let mut layers = 1;
    let mut visited = 0;
    for value in std::iter::once(second).chain(values) {
        let src = to_tree(&value).map_err(MergeError::Encode)?;
        let mut ctx = MergeContext::new();
        ctx.deep_merge(&mut acc, &src)?;
        layers += 1;
        visited += ctx.visited();
    }
    debug!(layers, visited, "merged config values");

    untag_variants(&mut acc);
    T::deserialize_in_place(acc, &mut first).map_err(MergeError::Decode)?;
    Ok(first)
}

/// Merge value trees in order, with later trees taking precedence.
///
/// No trees yield `Value::Null`.
pub fn merge_values(values: impl IntoIterator<Item = Value>) -> Result<Value, MergeError> {
    let mut values = values.into_iter();
    let Some(mut acc) = values.next() else {
        return Ok(Value::Null);
    };
    for src in values {
        deep_merge(&mut acc, &src)?;
    }
    Ok(acc)
}

/// Merge `overlay` into `base` with a fresh [`MergeContext`].
pub fn deep_merge(base: &mut Value, overlay: &Value) -> Result<(), MergeError> {
    MergeContext::new().deep_merge(base, overlay)
}

/// State carried through one merge: the source nodes already merged and the
/// path of the node being merged.
///
/// Node identity is the address of a source node, so the context borrows
/// every source tree merged through it.
#[derive(Debug, Default)]
pub struct MergeContext<'a> {
    visited: HashSet<*const Value>,
    path: Vec<String>,
    _src: PhantomData<&'a Value>,
}

impl<'a> MergeContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct source objects merged so far.
    pub fn visited(&self) -> usize {
        self.visited.len()
    }

    /// Dotted path of the node being merged.
    pub fn field_path(&self) -> String {
        self.path.join(".")
    }

    /// Merge `src` into `dst`.
    ///
    /// - Objects: keys missing from `dst` are copied in, shared keys recurse
    /// - Arrays: a non-empty `src` replaces `dst`
    /// - Null `src`: `dst` is kept
    /// - Null `dst`: becomes a copy of `src`
    /// - Scalars: a non-zero `src` replaces `dst`
    /// - Enum values of different variants: `src` replaces `dst`
    ///
    /// A source object that was already merged through this context is
    /// skipped. Differently shaped values at the same path are an error.
    pub fn deep_merge(&mut self, dst: &mut Value, src: &'a Value) -> Result<(), MergeError> {
        if src.is_null() {
            return Ok(());
        }
        if dst.is_null() {
            *dst = src.clone();
            return Ok(());
        }

        if let (Some(from), Some(to)) = (tree::variant(dst), tree::variant(src))
            && from != to
        {
            trace!(path = %self.field_path(), from, to, "replacing enum variant");
            *dst = src.clone();
            return Ok(());
        }

        if let (Value::Object(dst_map), Value::Object(src_map)) = (&mut *dst, src) {
            if !self.visited.insert(std::ptr::from_ref(src)) {
                trace!(path = %self.field_path(), "skipping visited node");
                return Ok(());
            }
            return self.merge_objects(dst_map, src_map);
        }

        let replace = match (&*dst, src) {
            (Value::Array(_), Value::Array(items)) => !items.is_empty(),
            (Value::String(_), Value::String(s)) => !s.is_empty(),
            (Value::Bool(_), Value::Bool(b)) => *b,
            (Value::Number(_), Value::Number(n)) => !is_zero(n),
            _ => {
                return Err(MergeError::TypeMismatch {
                    path: self.display_path(),
                    dst: kind(dst),
                    src: kind(src),
                });
            }
        };
        if replace {
            *dst = src.clone();
        }
        Ok(())
    }

    fn merge_objects(
        &mut self,
        dst: &mut Map<String, Value>,
        src: &'a Map<String, Value>,
    ) -> Result<(), MergeError> {
        for (key, src_value) in src {
            match dst.get_mut(key) {
                Some(dst_value) => {
                    self.path.push(key.clone());
                    let result = self.deep_merge(dst_value, src_value);
                    self.path.pop();
                    result?;
                }
                None => {
                    dst.insert(key.clone(), src_value.clone());
                }
            }
        }
        Ok(())
    }

    fn display_path(&self) -> String {
        if self.path.is_empty() {
            "<root>".to_string()
        } else {
            self.field_path()
        }
    }
}

fn is_zero(n: &serde_json::Number) -> bool {
    if let Some(i) = n.as_i64() {
        i == 0
    } else if let Some(u) = n.as_u64() {
        u == 0
    } else {
        n.as_f64() == Some(0.0)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
