//! The attribute bag and the trait for entities that own one.

use common_error::{StrataError, StrataResult, ensure, invalid_argument_err};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{AttributeScope, keys, keywordize};
use crate::types::{ColumnType, Value};

/// Map of attribute names to values.
pub type AttributeMap = IndexMap<String, Value>;

/// Named metadata dictionary with validated well-known keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BagRecord")]
pub struct AttributeBag {
    scope: AttributeScope,
    values: AttributeMap,
}

impl AttributeBag {
    /// Create an empty bag.
    pub fn new(scope: AttributeScope) -> Self {
        Self {
            scope,
            values: AttributeMap::new(),
        }
    }

    /// Create a bag holding only a `name` attribute.
    pub fn with_name(scope: AttributeScope, name: impl Into<String>) -> Self {
        let mut values = AttributeMap::new();
        values.insert(keys::NAME.to_string(), Value::String(name.into()));
        Self { scope, values }
    }

    /// Create a bag pre-filled with `values`, validating every entry.
    pub fn with_values(scope: AttributeScope, values: AttributeMap) -> StrataResult<Self> {
        let mut bag = Self::new(scope);
        bag.merge(values)?;
        Ok(bag)
    }

    /// The scope this bag validates against.
    pub fn scope(&self) -> AttributeScope {
        self.scope
    }

    /// Check one key/value pair against the rules of `scope`.
    pub fn validate_entry(scope: AttributeScope, key: &str, value: &Value) -> StrataResult<()> {
        if key.is_empty() {
            invalid_argument_err!("attribute key must be a non-empty string");
        }
        if scope.is_well_known(key) && !matches!(value, Value::String(_)) {
            invalid_argument_err!(
                "attribute '{key}' must be a string, got {}",
                value.type_name()
            );
        }
        if scope == AttributeScope::Column && key == keys::TYPE {
            let known = value.as_str().and_then(ColumnType::parse).is_some();
            if !known {
                invalid_argument_err!("column type '{value}' is not a recognized data type");
            }
        }
        Ok(())
    }

    /// Check every entry of `values` against the rules of `scope`.
    pub fn validate(scope: AttributeScope, values: &AttributeMap) -> StrataResult<()> {
        values
            .iter()
            .try_for_each(|(key, value)| Self::validate_entry(scope, key, value))
    }

    /// Get an attribute value.
    ///
    /// Fails with `InvalidArgument` for an empty key; a missing key is `Ok(None)`.
    pub fn get(&self, key: &str) -> StrataResult<Option<&Value>> {
        if key.is_empty() {
            invalid_argument_err!("attribute key must be a non-empty string");
        }
        Ok(self.values.get(key))
    }

    /// Get an attribute as a string slice, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Check if an attribute exists.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Set one attribute, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> StrataResult<Option<Value>> {
        let key = key.into();
        let value = value.into();
        Self::validate_entry(self.scope, &key, &value)?;
        Ok(self.values.insert(key, value))
    }

    /// Merge many attributes. Nothing is applied unless every entry is valid.
    pub fn merge(&mut self, values: AttributeMap) -> StrataResult<()> {
        Self::validate(self.scope, &values)?;
        self.values.extend(values);
        Ok(())
    }

    /// Remove an attribute.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    /// Remove all attributes.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &AttributeMap {
        &self.values
    }

    /// Copy the underlying map.
    pub fn to_map(&self) -> AttributeMap {
        self.values.clone()
    }

    /// The `name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.get_str(keys::NAME)
    }

    /// Keywords for search indexing, see [`keywordize`].
    pub fn keywords(&self) -> Vec<String> {
        keywordize(self.scope, &self.values)
    }

    /// Fail with `InvalidContent` unless the bag has scope `scope`.
    pub(crate) fn expect_scope(&self, scope: AttributeScope, owner: &str) -> StrataResult<()> {
        ensure!(
            self.scope == scope,
            InvalidContent: "{owner} attributes must have {scope:?} scope, found {:?}",
            self.scope
        );
        Ok(())
    }
}

/// Serialized shape of an [`AttributeBag`]; entries are validated on the way in.
#[derive(Deserialize)]
struct BagRecord {
    scope: AttributeScope,
    values: AttributeMap,
}

impl TryFrom<BagRecord> for AttributeBag {
    type Error = StrataError;

    fn try_from(record: BagRecord) -> StrataResult<Self> {
        Self::with_values(record.scope, record.values)
    }
}

impl<'a> IntoIterator for &'a AttributeBag {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Collect `(key, value)` pairs into an [`AttributeMap`].
pub(crate) fn collect_attributes<I, K, V>(attributes: I) -> AttributeMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    attributes
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Trait for containers that own an attribute bag.
pub trait HasAttributes {
    /// Get the attribute bag.
    fn attributes(&self) -> &AttributeBag;

    /// Get a mutable reference to the attribute bag.
    fn attributes_mut(&mut self) -> &mut AttributeBag;

    /// Get an attribute value by name.
    fn get_attribute(&self, key: &str) -> StrataResult<Option<&Value>> {
        self.attributes().get(key)
    }

    /// Set an attribute value.
    fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) -> StrataResult<()>
    where
        Self: Sized,
    {
        self.attributes_mut().set(key, value).map(|_| ())
    }

    /// Merge attributes, all-or-nothing.
    fn set_attributes(&mut self, values: AttributeMap) -> StrataResult<()> {
        self.attributes_mut().merge(values)
    }

    /// Short name.
    fn name(&self) -> Option<&str> {
        self.attributes().get_str(keys::NAME)
    }

    /// Long name.
    fn long_name(&self) -> Option<&str> {
        self.attributes().get_str(keys::LONG_NAME)
    }

    /// Description.
    fn description(&self) -> Option<&str> {
        self.attributes().get_str(keys::DESCRIPTION)
    }

    /// File the container was decoded from.
    fn source_file_name(&self) -> Option<&str> {
        self.attributes().get_str(keys::SOURCE_FILE_NAME)
    }

    /// MIME type of the syntax the container was decoded from.
    fn source_mime_type(&self) -> Option<&str> {
        self.attributes().get_str(keys::SOURCE_MIME_TYPE)
    }

    /// Name of the syntax the container was decoded from.
    fn source_syntax(&self) -> Option<&str> {
        self.attributes().get_str(keys::SOURCE_SYNTAX)
    }

    /// Name of the schema the decoded content followed.
    fn source_schema_name(&self) -> Option<&str> {
        self.attributes().get_str(keys::SOURCE_SCHEMA_NAME)
    }

    /// Keywords for search indexing.
    fn keywords(&self) -> Vec<String> {
        self.attributes().keywords()
    }
}

impl From<AttributeBag> for AttributeMap {
    fn from(bag: AttributeBag) -> Self {
        bag.values
    }
}

impl TryFrom<(AttributeScope, AttributeMap)> for AttributeBag {
    type Error = StrataError;

    fn try_from((scope, values): (AttributeScope, AttributeMap)) -> StrataResult<Self> {
        Self::with_values(scope, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, Value)]) -> AttributeMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_get_and_set() {
        let mut bag = AttributeBag::new(AttributeScope::Container);
        assert_eq!(bag.get("name").unwrap(), None);

        bag.set("name", "Sales").unwrap();
        bag.set("rows", 12i64).unwrap();

        assert_eq!(bag.name(), Some("Sales"));
        assert_eq!(bag.get("rows").unwrap(), Some(&Value::Int64(12)));
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_deserialize_validates_entries() {
        let bag: AttributeBag =
            serde_json::from_str(r#"{"scope": "Container", "values": {"name": "ok", "n": 1}}"#)
                .unwrap();
        assert_eq!(bag.name(), Some("ok"));

        let err = serde_json::from_str::<AttributeBag>(
            r#"{"scope": "Container", "values": {"name": 5}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("must be a string"), "{err}");
        assert!(
            serde_json::from_str::<AttributeBag>(r#"{"scope": "Column", "values": {"type": "blob"}}"#)
                .is_err()
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut bag = AttributeBag::new(AttributeScope::Item);
        assert!(matches!(bag.get(""), Err(StrataError::InvalidArgument(_))));
        assert!(matches!(bag.set("", 1i64), Err(StrataError::InvalidArgument(_))));
    }

    #[test]
    fn test_well_known_keys_must_be_strings() {
        let mut container = AttributeBag::new(AttributeScope::Container);
        assert!(container.set("sourceSyntax", 3i64).is_err());
        assert!(container.set("description", Value::Null).is_err());

        // Container-only keys are free-form on items.
        let mut item = AttributeBag::new(AttributeScope::Item);
        item.set("sourceSyntax", 3i64).unwrap();
        assert!(item.set("longName", true).is_err());
    }

    #[test]
    fn test_column_type_validation() {
        let mut column = AttributeBag::new(AttributeScope::Column);
        column.set("type", "integer").unwrap();
        assert!(column.set("type", "decimal").is_err());
        assert!(column.set("type", 5i64).is_err());
        assert_eq!(column.get_str("type"), Some("integer"));

        // Only columns constrain `type`.
        let mut item = AttributeBag::new(AttributeScope::Item);
        item.set("type", "decimal").unwrap();
    }

    #[test]
    fn test_merge_is_atomic() {
        let mut bag = AttributeBag::new(AttributeScope::Item);
        bag.set("name", "before").unwrap();

        let result = bag.merge(map(&[
            ("name", Value::from("after")),
            ("color", Value::from("red")),
            ("description", Value::Int64(1)),
        ]));

        assert!(result.is_err());
        assert_eq!(bag.name(), Some("before"));
        assert!(!bag.contains("color"));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut bag = AttributeBag::with_values(
            AttributeScope::Item,
            map(&[("a", Value::Int64(1)), ("b", Value::Int64(2))]),
        )
        .unwrap();

        assert_eq!(bag.remove("a"), Some(Value::Int64(1)));
        assert_eq!(bag.remove("a"), None);
        bag.clear();
        assert!(bag.is_empty());
    }
}
