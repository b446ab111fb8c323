//! Field-addressable record wrapper.
//!
//! A [`Record`] is the document flowing through the pipeline: a JSON object
//! whose fields are read and written through dotted paths. Path segments
//! address object keys; segments that parse as numbers address array
//! elements on read. The record is owned by the caller and mutated in place
//! by the step executor.

use serde_json::{Map, Value};

/// One pipeline document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON value, which must be an object.
    pub fn from_value(value: &Value) -> anyhow::Result<Self> {
        match value {
            Value::Object(map) => Ok(Self { fields: map.clone() }),
            other => anyhow::bail!("record must be a JSON object, got {other}"),
        }
    }

    /// Consume the record and return its fields as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Borrow the underlying field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Resolve a dotted path to a field value.
    ///
    /// Returns `None` when any segment is absent. A present-but-null field
    /// resolves to `Some(&Value::Null)`; callers that treat null as missing
    /// (the ignore-missing policy) must check for it themselves.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.').filter(|segment| !segment.is_empty());
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;

        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Write a value at a dotted path, creating intermediate objects.
    ///
    /// Existing values along the path are overwritten: a leaf value that
    /// stands where an object is needed is replaced by one, and the final
    /// segment always overwrites whatever is there. This is what allows a
    /// step to write its result over its own source field.
    pub fn set_path(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').filter(|segment| !segment.is_empty()).collect();
        if segments.is_empty() {
            return;
        }

        let mut current = &mut self.fields;
        for segment in &segments[..segments.len() - 1] {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = entry.as_object_mut().expect("entry was just made an object");
        }
        current.insert(segments[segments.len() - 1].to_string(), value);
    }
}
