//! Dynamic row record

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::Value;

/// A row returned by a data source.
///
/// Fields hold [`Value`]s and may nest other records, so a column can reach
/// into related data with a dotted attribute path such as `"artist.name"`.
///
/// # Example
///
/// ```
/// use dodotable_lib::model::Record;
/// use dodotable_lib::model::Value;
///
/// let artist = Record::new().set("name", "Coltrane");
/// let record = Record::new().set("title", "Blue Train").set("artist", artist);
///
/// assert_eq!(record.lookup("artist.name"), Some(&Value::from("Coltrane")));
/// assert_eq!(record.lookup_or("artist.born", &Value::Null), &Value::Null);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from flat column/value pairs.
    ///
    /// Keys containing dots are nested, so a SQL column aliased as
    /// `"artist.name"` becomes the `name` field of the `artist` record. When a
    /// nested key collides with a scalar of the same name, the later key wins.
    pub fn from_flat<K, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut record = Self::new();
        for (key, value) in pairs {
            record.insert_path(key.as_ref(), value);
        }
        record
    }

    /// Builds a record from a JSON object.
    pub fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }

    // =========================================================================
    // Field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Returns the number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Follows a dotted attribute path through nested records.
    ///
    /// Returns `None` as soon as a segment is missing or the value reached so
    /// far is not a record.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;
        for segment in segments {
            current = current.as_record()?.fields.get(segment)?;
        }
        Some(current)
    }

    /// Like [`lookup`](Self::lookup), returning `default` on any missing segment.
    pub fn lookup_or<'r>(&'r self, path: &str, default: &'r Value) -> &'r Value {
        self.lookup(path).unwrap_or(default)
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    fn insert_path(&mut self, path: &str, value: Value) {
        match path.split_once('.') {
            None => {
                self.fields.insert(path.to_string(), value);
            }
            Some((head, rest)) => {
                let slot = self
                    .fields
                    .entry(head.to_string())
                    .or_insert_with(|| Value::Record(Box::default()));
                if !matches!(slot, Value::Record(_)) {
                    *slot = Value::Record(Box::default());
                }
                if let Value::Record(nested) = slot {
                    nested.insert_path(rest, value);
                }
            }
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Record, Record) {
        let a = Record::new().set("c", "ac").set("d", "ad");
        let data = Record::new().set("a", a.clone()).set("b", "b");
        (data, a)
    }

    #[test]
    fn test_lookup_nested() {
        let (data, a) = sample();
        assert_eq!(data.lookup("a"), Some(&Value::from(a)));
        assert_eq!(data.lookup("a.c"), Some(&Value::from("ac")));
        assert_eq!(data.lookup("a.d"), Some(&Value::from("ad")));
        assert_eq!(data.lookup("b"), Some(&Value::from("b")));
    }

    #[test]
    fn test_lookup_or_default() {
        let (data, _) = sample();
        let empty = Value::from("");
        let fallback = Value::from("default");
        assert_eq!(data.lookup_or("a.b", &Value::Null), &Value::Null);
        assert_eq!(data.lookup_or("a.b", &empty), &empty);
        assert_eq!(data.lookup_or("a.b", &fallback), &fallback);
        assert_eq!(data.lookup_or("c", &Value::Null), &Value::Null);
        assert_eq!(data.lookup_or("c", &fallback), &fallback);
    }

    #[test]
    fn test_lookup_through_scalar() {
        let (data, _) = sample();
        assert_eq!(data.lookup("b.c"), None);
    }

    #[test]
    fn test_from_flat_nests_dotted_keys() {
        let record = Record::from_flat([
            ("title", Value::from("Blue Train")),
            ("artist.name", Value::from("Coltrane")),
            ("artist.label.name", Value::from("Blue Note")),
        ]);
        assert_eq!(record.lookup("artist.name"), Some(&Value::from("Coltrane")));
        assert_eq!(
            record.lookup("artist.label.name"),
            Some(&Value::from("Blue Note"))
        );
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_display_is_json() {
        let record = Record::new().set("a", 1i64).set("b", "x");
        assert_eq!(record.to_string(), r#"{"a":1,"b":"x"}"#);
    }
}
