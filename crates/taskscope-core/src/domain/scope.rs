//! ArgScope - タスク呼び出しごとの引数スコープ
//!
//! Positional values are bound to declared parameter names at construction.
//! Values beyond the declared names are kept as "extras", and a scope derived
//! for a prerequisite keeps a handle to the scope it was derived from so
//! unbound names resolve by walking up the chain.
//!
//! # Lookup
//! 1. own bindings
//! 2. parent (recursively)
//! 3. absent (`None`)
//!
//! Absence is never an error: an unknown name simply resolves to `None`.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tracing::{debug, trace};

use super::name::ArgName;

static EMPTY: LazyLock<Arc<ArgScope>> = LazyLock::new(|| Arc::new(ArgScope::default()));

/// Arguments bound to one task invocation.
///
/// - `names`: declared parameter order for this invocation
/// - `values`: positional values as supplied (may be shorter or longer than `names`)
/// - `bindings`: name -> value for every position whose value is non-null
/// - `parent`: the scope this one was derived from, used for lookup only
///
/// The parent is shared through `Arc` and never mutated through a child. To
/// apply defaults to a scope that is already shared, go through
/// `Arc::make_mut`; children derived earlier keep the snapshot they saw.
#[derive(Debug, Clone, Default)]
pub struct ArgScope {
    names: Vec<ArgName>,
    values: Vec<Value>,
    bindings: IndexMap<ArgName, Value>,
    parent: Option<Arc<ArgScope>>,
}

impl ArgScope {
    /// Create a root scope (no parent).
    pub fn new(names: Vec<ArgName>, values: Vec<Value>) -> Self {
        Self::build(names, values, None)
    }

    /// Create a scope that delegates unresolved lookups to `parent`.
    pub fn with_parent(names: Vec<ArgName>, values: Vec<Value>, parent: Arc<ArgScope>) -> Self {
        Self::build(names, values, Some(parent))
    }

    fn build(names: Vec<ArgName>, values: Vec<Value>, parent: Option<Arc<ArgScope>>) -> Self {
        let mut bindings = IndexMap::with_capacity(names.len());
        // zip stops at the shorter side: unnamed positions never bind
        for (name, value) in names.iter().zip(values.iter()) {
            if !value.is_null() {
                bindings.insert(name.clone(), value.clone());
            }
        }
        Self {
            names,
            values,
            bindings,
            parent,
        }
    }

    /// The shared "no arguments" scope.
    ///
    /// Created once on first use and never mutated afterwards.
    pub fn empty() -> Arc<ArgScope> {
        Arc::clone(&EMPTY)
    }

    pub fn names(&self) -> &[ArgName] {
        &self.names
    }

    pub fn parent(&self) -> Option<&Arc<ArgScope>> {
        self.parent.as_ref()
    }

    /// Resolve `name` through this scope and its ancestors.
    ///
    /// A local binding always shadows an ancestor's, even when that local
    /// value is null (only possible through a null default), in which case
    /// the result is `None`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let mut scope = self;
        loop {
            if let Some(value) = scope.bindings.get(name) {
                return Some(value).filter(|v| !v.is_null());
            }
            scope = scope.parent.as_deref()?;
        }
    }

    /// Resolve the parameter declared at `index`.
    ///
    /// Positions past the declared names have no identifier and resolve to
    /// `None`; use [`ArgScope::extras`] to read them.
    pub fn get_at(&self, index: usize) -> Option<&Value> {
        self.names.get(index).and_then(|name| self.get(name.as_str()))
    }

    /// Lookup by an identifier chosen at runtime (e.g. a name read from a
    /// template or a user prompt). Same semantics as [`ArgScope::get`].
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }

    /// Batch form of [`ArgScope::get`]; one entry per requested name.
    pub fn values_at<'a, I>(&self, names: I) -> Vec<Option<&Value>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().map(|name| self.get(name)).collect()
    }

    /// Copy of the positional values as supplied.
    pub fn to_values(&self) -> Vec<Value> {
        self.values.clone()
    }

    /// Values supplied beyond the declared names.
    pub fn extras(&self) -> &[Value] {
        self.values.get(self.names.len()..).unwrap_or(&[])
    }

    /// Derive the scope a prerequisite runs with.
    ///
    /// Each of the prerequisite's declared `names` is resolved through this
    /// scope (null when unresolved), this scope's extras are appended, and the
    /// new scope's parent is exactly `self`.
    pub fn derive_child(self: &Arc<Self>, names: Vec<ArgName>) -> ArgScope {
        let mut values: Vec<Value> = names
            .iter()
            .map(|name| self.get(name.as_str()).cloned().unwrap_or(Value::Null))
            .collect();
        let extras = self.extras();
        values.extend_from_slice(extras);

        debug!(
            names = ?names,
            extras = extras.len(),
            "derived child argument scope"
        );
        ArgScope::with_parent(names, values, Arc::clone(self))
    }

    /// Fill unbound names with defaults.
    ///
    /// Existing bindings are never overwritten; new entries are appended in
    /// the order `defaults` yields them. Only this scope's own bindings are
    /// touched. Calling this twice with the same defaults is a no-op the
    /// second time.
    pub fn with_defaults<I, K>(&mut self, defaults: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<ArgName>,
    {
        for (name, value) in defaults {
            if let Entry::Vacant(slot) = self.bindings.entry(name.into()) {
                trace!(name = %slot.key(), "argument filled from default");
                slot.insert(value);
            }
        }
    }

    /// Own bindings in insertion order (construction order, then defaults).
    pub fn iter(&self) -> indexmap::map::Iter<'_, ArgName, Value> {
        self.bindings.iter()
    }

    /// Read-only view of the own bindings.
    pub fn as_map(&self) -> &IndexMap<ArgName, Value> {
        &self.bindings
    }

    /// Owned copy of the own bindings.
    pub fn to_map(&self) -> IndexMap<ArgName, Value> {
        self.bindings.clone()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<'a> IntoIterator for &'a ArgScope {
    type Item = (&'a ArgName, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, ArgName, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ArgScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str("}")
    }
}

// Unlink the parent chain iteratively; the default drop glue recurses once
// per level and overflows the stack on long chains.
impl Drop for ArgScope {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(parent) = next {
            next = match Arc::try_unwrap(parent) {
                Ok(mut scope) => scope.parent.take(),
                Err(_) => None,
            };
        }
    }
}

/// Serializes as the own bindings map (`{"name": value, ...}`).
impl Serialize for ArgScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bindings.serialize(serializer)
    }
}
