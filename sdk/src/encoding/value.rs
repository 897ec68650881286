//! The value tree the canonical codec reads and writes, plus the two helpers
//! every typed record uses to get in and out of it: [`MapBuilder`] on the way
//! out and [`MapReader`] on the way in.

use std::collections::BTreeMap;

use super::DecodeError;

/// One node of a canonical document.
///
/// Map keys are strings and are kept in a `BTreeMap`, so iteration order is
/// already the canonical byte order and duplicates cannot exist. A
/// non-negative `Int` is written exactly like the equal `Uint`; the decoder
/// only ever produces `Int` for negative numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Uint(u64),
    Int(i64),
    Bool(bool),
    Str(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// True for the type's zero value: `0`, `false`, `""`, empty bytes, an
    /// empty array, or a map with no non-zero entries.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Uint(n) => *n == 0,
            Value::Int(n) => *n == 0,
            Value::Bool(b) => !*b,
            Value::Str(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Map(entries) => entries.values().all(Value::is_zero),
        }
    }

    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Uint(_) | Value::Int(_) => "integer",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Fluent builder for canonical maps. Zero-valued fields are skipped as they
/// are added, so the built map never carries an entry the encoder would drop.
#[derive(Debug, Default)]
pub struct MapBuilder {
    entries: BTreeMap<String, Value>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uint(self, key: &str, value: u64) -> Self {
        self.value(key, Value::Uint(value))
    }

    pub fn boolean(self, key: &str, value: bool) -> Self {
        self.value(key, Value::Bool(value))
    }

    pub fn string(self, key: &str, value: &str) -> Self {
        self.value(key, Value::Str(value.to_owned()))
    }

    pub fn bytes(self, key: &str, value: &[u8]) -> Self {
        self.value(key, Value::Bytes(value.to_vec()))
    }

    /// Fixed-size byte field; an all-zero array counts as absent.
    pub fn fixed(self, key: &str, value: &[u8]) -> Self {
        if value.iter().all(|b| *b == 0) {
            return self;
        }
        self.bytes(key, value)
    }

    pub fn optional_fixed(self, key: &str, value: Option<&[u8]>) -> Self {
        match value {
            Some(v) => self.fixed(key, v),
            None => self,
        }
    }

    pub fn array(self, key: &str, items: Vec<Value>) -> Self {
        self.value(key, Value::Array(items))
    }

    pub fn value(mut self, key: &str, value: Value) -> Self {
        if !value.is_zero() {
            self.entries.insert(key.to_owned(), value);
        }
        self
    }

    pub fn build(self) -> Value {
        Value::Map(self.entries)
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Consumes the entries of a decoded map field by field.
///
/// Absent fields read as their zero value. Every read removes the entry, and
/// [`MapReader::finish`] fails if anything is left over, which is how unknown
/// fields get rejected instead of silently dropped.
#[derive(Debug)]
pub struct MapReader {
    context: &'static str,
    entries: BTreeMap<String, Value>,
}

impl MapReader {
    pub fn new(value: Value, context: &'static str) -> Result<Self, DecodeError> {
        match value {
            Value::Map(entries) => Ok(Self { context, entries }),
            other => Err(DecodeError::WrongType {
                field: context.to_string(),
                expected: "map",
                found: other.kind(),
            }),
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes and returns a raw entry.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn uint(&mut self, key: &str) -> Result<u64, DecodeError> {
        match self.take(key) {
            None => Ok(0),
            Some(Value::Uint(n)) => Ok(n),
            Some(other) => Err(self.wrong_type(key, "unsigned integer", &other)),
        }
    }

    pub fn boolean(&mut self, key: &str) -> Result<bool, DecodeError> {
        match self.take(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(b),
            Some(other) => Err(self.wrong_type(key, "bool", &other)),
        }
    }

    pub fn string(&mut self, key: &str) -> Result<String, DecodeError> {
        match self.take(key) {
            None => Ok(String::new()),
            Some(Value::Str(s)) => Ok(s),
            Some(other) => Err(self.wrong_type(key, "string", &other)),
        }
    }

    pub fn bytes(&mut self, key: &str) -> Result<Vec<u8>, DecodeError> {
        match self.take(key) {
            None => Ok(Vec::new()),
            Some(Value::Bytes(b)) => Ok(b),
            Some(other) => Err(self.wrong_type(key, "bytes", &other)),
        }
    }

    /// Fixed-size field; absent reads as all zeros.
    pub fn fixed<const N: usize>(&mut self, key: &str) -> Result<[u8; N], DecodeError> {
        Ok(self.optional_fixed(key)?.unwrap_or([0u8; N]))
    }

    pub fn optional_fixed<const N: usize>(
        &mut self,
        key: &str,
    ) -> Result<Option<[u8; N]>, DecodeError> {
        if !self.has(key) {
            return Ok(None);
        }
        let raw = self.bytes(key)?;
        let fixed = fixed_from_slice(&raw, self.field(key))?;
        if fixed.iter().all(|b| *b == 0) {
            return Err(DecodeError::ExplicitZero {
                key: self.field(key),
            });
        }
        Ok(Some(fixed))
    }

    pub fn array(&mut self, key: &str) -> Result<Vec<Value>, DecodeError> {
        match self.take(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(self.wrong_type(key, "array", &other)),
        }
    }

    /// Nested map field; absent reads as `None`.
    pub fn map(&mut self, key: &str, context: &'static str) -> Result<Option<MapReader>, DecodeError> {
        match self.take(key) {
            None => Ok(None),
            Some(value) => MapReader::new(value, context).map(Some),
        }
    }

    /// Fails if any entry was never read.
    pub fn finish(self) -> Result<(), DecodeError> {
        match self.entries.into_keys().next() {
            None => Ok(()),
            Some(field) => Err(DecodeError::UnknownField {
                context: self.context,
                field,
            }),
        }
    }

    pub fn field(&self, key: &str) -> String {
        format!("{}.{}", self.context, key)
    }

    fn wrong_type(&self, key: &str, expected: &'static str, found: &Value) -> DecodeError {
        DecodeError::WrongType {
            field: self.field(key),
            expected,
            found: found.kind(),
        }
    }
}

/// Copies a byte slice into a fixed array, reporting the field on mismatch.
pub fn fixed_from_slice<const N: usize>(raw: &[u8], field: String) -> Result<[u8; N], DecodeError> {
    raw.try_into().map_err(|_| DecodeError::WrongLength {
        field,
        expected: N,
        found: raw.len(),
    })
}

/// Unwraps an array element that must be byte string.
pub fn expect_bytes(value: Value, field: String) -> Result<Vec<u8>, DecodeError> {
    match value {
        Value::Bytes(b) => Ok(b),
        other => Err(DecodeError::WrongType {
            field,
            expected: "bytes",
            found: other.kind(),
        }),
    }
}

/// Unwraps an array element that must be an unsigned integer.
pub fn expect_uint(value: Value, field: String) -> Result<u64, DecodeError> {
    match value {
        Value::Uint(n) => Ok(n),
        other => Err(DecodeError::WrongType {
            field,
            expected: "unsigned integer",
            found: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values() {
        assert!(Value::Uint(0).is_zero());
        assert!(Value::Bool(false).is_zero());
        assert!(Value::Str(String::new()).is_zero());
        assert!(Value::Bytes(vec![]).is_zero());
        assert!(Value::Array(vec![]).is_zero());
        assert!(MapBuilder::new().uint("a", 0).build().is_zero());
        assert!(!Value::Array(vec![Value::Uint(0)]).is_zero());
        assert!(!Value::Int(-1).is_zero());
    }

    #[test]
    fn builder_skips_zero_fields() {
        let value = MapBuilder::new()
            .uint("fee", 0)
            .uint("fv", 10)
            .fixed("grp", &[0u8; 32])
            .bytes("note", &[])
            .boolean("nonpart", false)
            .build();
        match value {
            Value::Map(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries.get("fv"), Some(&Value::Uint(10)));
            }
            _ => panic!("expected map"),
        }
    }

    #[test]
    fn reader_defaults_and_finish() {
        let value = MapBuilder::new().uint("fv", 10).string("type", "pay").build();
        let mut reader = MapReader::new(value, "txn").unwrap();
        assert_eq!(reader.uint("fv").unwrap(), 10);
        assert_eq!(reader.uint("fee").unwrap(), 0);
        assert_eq!(reader.fixed::<32>("grp").unwrap(), [0u8; 32]);
        assert_eq!(reader.string("type").unwrap(), "pay");
        reader.finish().unwrap();
    }

    #[test]
    fn reader_rejects_leftovers() {
        let value = MapBuilder::new().uint("fv", 1).uint("zzz", 2).build();
        let mut reader = MapReader::new(value, "txn").unwrap();
        reader.uint("fv").unwrap();
        match reader.finish() {
            Err(DecodeError::UnknownField { context, field }) => {
                assert_eq!(context, "txn");
                assert_eq!(field, "zzz");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn reader_type_and_length_errors() {
        let value = MapBuilder::new()
            .string("fv", "oops")
            .bytes("snd", &[1, 2, 3])
            .build();
        let mut reader = MapReader::new(value, "txn").unwrap();
        assert!(matches!(reader.uint("fv"), Err(DecodeError::WrongType { .. })));
        assert!(matches!(
            reader.fixed::<32>("snd"),
            Err(DecodeError::WrongLength { expected: 32, found: 3, .. })
        ));
    }

    #[test]
    fn reader_requires_map() {
        assert!(matches!(
            MapReader::new(Value::Uint(1), "txn"),
            Err(DecodeError::WrongType { expected: "map", .. })
        ));
    }
}
