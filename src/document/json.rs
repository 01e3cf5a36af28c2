//! Parsing for arbitrarily nested editor JSON.
//!
//! serde_json refuses input nested deeper than 128 levels, and both parsing
//! and dropping a `Value` recurse once per level. Content is only bounded by
//! size, so a valid document can be nested far deeper than either allows.

use std::ops::Deref;

use serde::Deserialize;
use serde_json::Value;

/// Stack kept free before recursing one more level.
pub(crate) const STACK_RED_ZONE: usize = 64 * 1024;
/// Size of each extra stack segment.
pub(crate) const STACK_SEGMENT: usize = 1024 * 1024;

/// A parsed value that is torn down iteratively when dropped.
#[derive(Debug)]
pub(crate) struct DeepValue(Value);

impl Deref for DeepValue {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.0
    }
}

impl Drop for DeepValue {
    fn drop(&mut self) {
        let mut pending = vec![std::mem::take(&mut self.0)];
        while let Some(value) = pending.pop() {
            match value {
                Value::Array(items) => pending.extend(items),
                Value::Object(fields) => pending.extend(fields.into_iter().map(|(_, v)| v)),
                _ => {}
            }
        }
    }
}

/// Parse a complete JSON text with no nesting limit.
pub(crate) fn parse_json(input: &str) -> serde_json::Result<DeepValue> {
    let mut de = serde_json::Deserializer::from_str(input);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    let value = DeepValue(value);
    de.end()?;
    Ok(value)
}
