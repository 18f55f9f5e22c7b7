//! Row trait for keyed field access

use std::collections::BTreeMap;
use std::collections::HashMap;

use super::Record;
use super::Value;

/// Anything the engine can read values from by key.
///
/// The engine only ever reads rows; it never mutates them. Returning `None`
/// means the key is absent, which the engine treats like `Value::Null`.
///
/// # Example
///
/// ```
/// use datatable_lib::model::{Row, Value};
///
/// struct Product {
///     name: String,
///     stock: i64,
/// }
///
/// impl Row for Product {
///     fn field(&self, key: &str) -> Option<Value> {
///         match key {
///             "name" => Some(Value::from(self.name.as_str())),
///             "stock" => Some(Value::from(self.stock)),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Row {
    /// Returns the value stored under `key`.
    fn field(&self, key: &str) -> Option<Value>;
}

impl Row for Record {
    fn field(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl Row for serde_json::Value {
    fn field(&self, key: &str) -> Option<Value> {
        self.as_object()
            .and_then(|map| map.get(key))
            .map(Value::from)
    }
}

impl Row for HashMap<String, Value> {
    fn field(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl Row for BTreeMap<String, Value> {
    fn field(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl<R: Row + ?Sized> Row for &R {
    fn field(&self, key: &str) -> Option<Value> {
        (**self).field(key)
    }
}
