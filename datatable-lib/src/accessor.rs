//! Column value resolution.

use std::fmt;
use std::sync::Arc;

use crate::model::Row;
use crate::model::Value;

/// Custom extraction function for computed columns.
pub type AccessorFn<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;

/// How a column pulls its value out of a row.
///
/// A column carries exactly one strategy, so there is no precedence to
/// resolve at lookup time. Columns built without an explicit accessor use
/// `Key(column id)`.
pub enum Accessor<T> {
    /// Direct key lookup on the row.
    Key(String),
    /// Dot-separated path descending through nested records (`meta.karat`).
    Path(String),
    /// Caller-supplied extraction; fully controls the output.
    Func(AccessorFn<T>),
}

impl<T> Accessor<T> {
    /// Creates a direct key accessor.
    pub fn key(key: impl Into<String>) -> Self {
        Accessor::Key(key.into())
    }

    /// Creates a nested path accessor.
    pub fn path(path: impl Into<String>) -> Self {
        Accessor::Path(path.into())
    }

    /// Creates a custom function accessor.
    pub fn func(f: impl Fn(&T) -> Value + Send + Sync + 'static) -> Self {
        Accessor::Func(Arc::new(f))
    }
}

impl<T: Row> Accessor<T> {
    /// Resolves the value for `row`.
    ///
    /// Returns `None` when a key or any path segment is missing. Never panics
    /// on absent or null intermediates; a panicking custom function is not
    /// caught.
    pub fn resolve(&self, row: &T) -> Option<Value> {
        match self {
            Accessor::Func(f) => Some(f(row)),
            Accessor::Path(path) => resolve_path(row, path),
            Accessor::Key(key) => row.field(key),
        }
    }
}

fn resolve_path<T: Row>(row: &T, path: &str) -> Option<Value> {
    let mut segments = path.split('.');
    let head = row.field(segments.next()?)?;

    let mut current = &head;
    for segment in segments {
        current = current.child(segment)?;
    }
    Some(current.clone())
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Key(key) => Accessor::Key(key.clone()),
            Accessor::Path(path) => Accessor::Path(path.clone()),
            Accessor::Func(f) => Accessor::Func(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Accessor::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Accessor::Func(_) => f.write_str("Func(..)"),
        }
    }
}
