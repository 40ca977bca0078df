//! The attribute bag.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use magic_types::{Attributes, Value};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::BagError;
use crate::functions::ClassFunctions;
use crate::mutators::{MethodSet, MutatorKind, Mutators, Plain, method_set};

/// Callable bound to the bag it was recorded on.
pub type Recording<K> = dyn Fn(&mut AttributeBag<K>, &[Value]) -> Option<Value> + Send + Sync;

/// A record whose fields are read and written through mutator hooks.
///
/// The key set is fixed by the constructor for writes: [`set`](Self::set)
/// only replaces values of keys that already exist. Reads and
/// [`isset`](Self::isset) also see virtual attributes computed by getters
/// the specialization `K` declares.
pub struct AttributeBag<K: Mutators = Plain> {
    attributes: Attributes,
    recordings: HashMap<String, Arc<Recording<K>>>,
    methods: Arc<MethodSet<K>>,
}

impl<K: Mutators> AttributeBag<K> {
    /// Store `attributes` as given. No setter runs.
    #[must_use]
    pub fn new(attributes: Attributes) -> Self {
        Self {
            attributes,
            recordings: HashMap::new(),
            methods: method_set::<K>(),
        }
    }

    /// Read `name` through its getter, or raw when there is none.
    ///
    /// Returns `None` for an absent key without a getter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let raw = self.attributes.get(name);
        match self.methods.get_mutator(name) {
            Some(getter) => {
                tracing::trace!(attribute = name, "Applying getter");
                getter(self, raw)
            }
            None => raw.cloned(),
        }
    }

    /// Stored value without mutators.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Replace the value of an existing key, passing it through the setter.
    ///
    /// Writing to a key the bag does not hold is ignored.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        if !self.attributes.contains_key(name) {
            tracing::trace!(attribute = name, "Ignoring write to unknown attribute");
            return;
        }

        let value = value.into();
        let value = match self.methods.set_mutator(name) {
            Some(setter) => setter(self, value),
            None => value,
        };
        if let Some(slot) = self.attributes.get_mut(name) {
            *slot = value;
        }
    }

    /// Whether `name` is stored or has a getter.
    #[must_use]
    pub fn isset(&self, name: &str) -> bool {
        self.attributes.contains_key(name) || self.methods.has_mutator(MutatorKind::Get, name)
    }

    /// Drop the stored value for `name`. Getters stay discoverable.
    pub fn unset(&mut self, name: &str) {
        self.attributes.shift_remove(name);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Record `callback` under `name`, replacing any earlier recording.
    ///
    /// The callback receives this bag when invoked through [`call`](Self::call).
    pub fn record<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&mut AttributeBag<K>, &[Value]) -> Option<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(recording = %name, "Recording method");
        self.recordings.insert(name, Arc::new(callback));
    }

    #[must_use]
    pub fn has_recording(&self, name: &str) -> bool {
        self.recordings.contains_key(name)
    }

    /// Invoke a recording. Unknown names return `None`.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Option<Value> {
        let Some(recording) = self.recordings.get(name).map(Arc::clone) else {
            tracing::trace!(recording = name, "No recording");
            return None;
        };
        recording(self, args)
    }

    /// Register a class function shared by every bag of every specialization.
    pub fn register_function<F>(name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> Option<Value> + Send + Sync + 'static,
    {
        ClassFunctions::global().register(name, function);
    }

    /// Invoke a class function. Unknown names return `None`.
    pub fn call_static(name: &str, args: &[Value]) -> Option<Value> {
        ClassFunctions::global().call(name, args)
    }

    /// The stored attributes, without recordings or computed values.
    #[must_use]
    pub fn to_attributes(&self) -> Attributes {
        self.attributes.clone()
    }

    #[must_use]
    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    /// Rebuild a bag from serialized attributes. Recordings start empty.
    #[must_use]
    pub fn from_attributes(attributes: Attributes) -> Self {
        Self::new(attributes)
    }

    /// Fails with [`BagError::Encode`] when a stored float is NaN or infinite.
    pub fn to_json(&self) -> Result<String, BagError> {
        serde_json::to_string(self).map_err(BagError::Encode)
    }

    pub fn from_json(json: &str) -> Result<Self, BagError> {
        serde_json::from_str(json).map_err(BagError::Decode)
    }

    /// Stored attributes overlaid with the value of every declared getter.
    ///
    /// Computed values win over stored ones; a getter yielding `None`
    /// shows as [`Value::Null`]. Nothing is written back.
    #[must_use]
    pub fn debug_attributes(&self) -> Attributes {
        let mut projection = self.attributes.clone();
        for (attribute, getter) in self.methods.getters() {
            let computed = getter(self, self.attributes.get(attribute)).unwrap_or_default();
            projection.insert(attribute.to_string(), computed);
        }
        projection
    }
}

impl<K: Mutators> Default for AttributeBag<K> {
    fn default() -> Self {
        Self::new(Attributes::new())
    }
}

impl<K: Mutators> Clone for AttributeBag<K> {
    fn clone(&self) -> Self {
        Self {
            attributes: self.attributes.clone(),
            recordings: self.recordings.clone(),
            methods: Arc::clone(&self.methods),
        }
    }
}

impl<K: Mutators> From<Attributes> for AttributeBag<K> {
    fn from(attributes: Attributes) -> Self {
        Self::new(attributes)
    }
}

impl<K: Mutators> fmt::Debug for AttributeBag<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.debug_attributes()).finish()
    }
}

impl<K: Mutators> Serialize for AttributeBag<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        for (name, value) in &self.attributes {
            value
                .ensure_finite()
                .map_err(|err| S::Error::custom(format_args!("attribute {name:?}: {err}")))?;
        }
        self.attributes.serialize(serializer)
    }
}

impl<'de, K: Mutators> Deserialize<'de> for AttributeBag<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Attributes::deserialize(deserializer).map(Self::from_attributes)
    }
}
