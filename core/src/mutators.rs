//! Mutator method sets and capability discovery.
//!
//! A specialization of [`AttributeBag`] declares its methods once through
//! [`Mutators::declare`]. The resulting [`MethodSet`] is keyed by method name,
//! so discovery for attribute `x` is a lookup of `getXAttribute` or
//! `setXAttribute` in that table. Method sets are built on first use of a
//! specialization and cached for the rest of the process.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use indexmap::IndexMap;
use magic_types::Value;

use crate::bag::AttributeBag;

/// Read hook: receives the raw stored value (if any) and the bag itself.
pub type Getter<K> = dyn Fn(&AttributeBag<K>, Option<&Value>) -> Option<Value> + Send + Sync;

/// Write hook: transforms the incoming value before it is stored.
pub type Setter<K> = dyn Fn(&AttributeBag<K>, Value) -> Value + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutatorKind {
    Get,
    Set,
}

impl MutatorKind {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
        }
    }
}

/// Method name a mutator for `attribute` must be declared under.
///
/// `get` / `set`, then the attribute with only its first character
/// upper-cased, then `Attribute`.
#[must_use]
pub fn mutator_name(kind: MutatorKind, attribute: &str) -> String {
    let mut name = String::with_capacity(attribute.len() + 12);
    name.push_str(kind.prefix());
    let mut chars = attribute.chars();
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.push_str(chars.as_str());
    }
    name.push_str("Attribute");
    name
}

/// A specialization of the attribute bag.
///
/// Implementors are usually unit marker types. The plain bag is [`Plain`].
pub trait Mutators: Sized + 'static {
    /// Declare the mutator methods this specialization defines.
    fn declare(_methods: &mut MethodSet<Self>) {}
}

/// The unspecialized bag: no mutators, every access is raw.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Mutators for Plain {}

/// A method body with no mutator role.
pub type Routine<K> = dyn Fn(&AttributeBag<K>, &[Value]) -> Option<Value> + Send + Sync;

/// A method body as handed to [`MethodSet::define`].
pub enum Definition<K: Mutators> {
    Get(Box<Getter<K>>),
    Set(Box<Setter<K>>),
    Routine(Box<Routine<K>>),
}

impl<K: Mutators> Definition<K> {
    pub fn getter<F>(getter: F) -> Self
    where
        F: Fn(&AttributeBag<K>, Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        Self::Get(Box::new(getter))
    }

    pub fn setter<F>(setter: F) -> Self
    where
        F: Fn(&AttributeBag<K>, Value) -> Value + Send + Sync + 'static,
    {
        Self::Set(Box::new(setter))
    }

    pub fn routine<F>(routine: F) -> Self
    where
        F: Fn(&AttributeBag<K>, &[Value]) -> Option<Value> + Send + Sync + 'static,
    {
        Self::Routine(Box::new(routine))
    }

    fn kind(&self) -> Option<MutatorKind> {
        match self {
            Self::Get(_) => Some(MutatorKind::Get),
            Self::Set(_) => Some(MutatorKind::Set),
            Self::Routine(_) => None,
        }
    }
}

struct Method<K: Mutators> {
    /// Set only when the method is a discoverable mutator.
    attribute: Option<String>,
    body: Definition<K>,
}

/// Attribute a convention method name was derived from.
///
/// `getFirstNameAttribute` yields `firstName`. Names that `mutator_name`
/// would not produce for any attribute (`getnameAttribute`, `fullName`)
/// yield `None`.
fn attribute_of(kind: MutatorKind, method: &str) -> Option<String> {
    let middle = method.strip_prefix(kind.prefix())?.strip_suffix("Attribute")?;
    let mut chars = middle.chars();
    let attribute = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };
    (mutator_name(kind, &attribute) == method).then_some(attribute)
}

/// The methods one specialization defines, keyed by method name in
/// declaration order.
pub struct MethodSet<K: Mutators> {
    methods: IndexMap<String, Method<K>>,
}

impl<K: Mutators> MethodSet<K> {
    fn new() -> Self {
        Self {
            methods: IndexMap::new(),
        }
    }

    fn declared() -> Self {
        let mut set = Self::new();
        K::declare(&mut set);
        set
    }

    /// Define `get<Attribute>Attribute`. A later declaration under the same
    /// method name replaces the earlier one.
    pub fn getter<F>(&mut self, attribute: impl Into<String>, getter: F) -> &mut Self
    where
        F: Fn(&AttributeBag<K>, Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.insert_mutator(attribute.into(), Definition::getter(getter))
    }

    /// Define `set<Attribute>Attribute`.
    pub fn setter<F>(&mut self, attribute: impl Into<String>, setter: F) -> &mut Self
    where
        F: Fn(&AttributeBag<K>, Value) -> Value + Send + Sync + 'static,
    {
        self.insert_mutator(attribute.into(), Definition::setter(setter))
    }

    /// Define a method under its literal name.
    ///
    /// A getter or setter body under a name that follows the convention for
    /// its kind becomes a mutator. Anything else is stored but never
    /// discovered.
    pub fn define(&mut self, method: impl Into<String>, body: Definition<K>) -> &mut Self {
        let method = method.into();
        let attribute = body.kind().and_then(|kind| attribute_of(kind, &method));
        if attribute.is_none() {
            tracing::debug!(method = %method, "Defined method is not a mutator");
        }
        self.methods.insert(method, Method { attribute, body });
        self
    }

    fn insert_mutator(&mut self, attribute: String, body: Definition<K>) -> &mut Self {
        let Some(kind) = body.kind() else {
            return self;
        };
        let name = mutator_name(kind, &attribute);
        self.methods.insert(
            name,
            Method {
                attribute: Some(attribute),
                body,
            },
        );
        self
    }

    /// Whether any method, mutator or not, is defined under `method`.
    #[must_use]
    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// The mutator of `kind` discoverable for `attribute`, if any.
    #[must_use]
    pub fn resolve(&self, kind: MutatorKind, attribute: &str) -> Option<&Definition<K>> {
        let method = self.methods.get(&mutator_name(kind, attribute))?;
        (method.attribute.is_some() && method.body.kind() == Some(kind)).then_some(&method.body)
    }

    /// A non-mutator method defined under `method`.
    #[must_use]
    pub fn routine(&self, method: &str) -> Option<&Routine<K>> {
        match &self.methods.get(method)?.body {
            Definition::Routine(routine) => Some(&**routine),
            Definition::Get(_) | Definition::Set(_) => None,
        }
    }

    /// Whether a mutator of `kind` is discoverable for `attribute`.
    #[must_use]
    pub fn has_mutator(&self, kind: MutatorKind, attribute: &str) -> bool {
        self.resolve(kind, attribute).is_some()
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub(crate) fn get_mutator(&self, attribute: &str) -> Option<&Getter<K>> {
        match self.resolve(MutatorKind::Get, attribute)? {
            Definition::Get(getter) => Some(&**getter),
            Definition::Set(_) | Definition::Routine(_) => None,
        }
    }

    pub(crate) fn set_mutator(&self, attribute: &str) -> Option<&Setter<K>> {
        match self.resolve(MutatorKind::Set, attribute)? {
            Definition::Set(setter) => Some(&**setter),
            Definition::Get(_) | Definition::Routine(_) => None,
        }
    }

    /// Every discoverable getter with the attribute name it was declared for.
    pub fn getters(&self) -> impl Iterator<Item = (&str, &Getter<K>)> {
        self.methods.values().filter_map(|method| {
            match (method.attribute.as_deref(), &method.body) {
                (Some(attribute), Definition::Get(getter)) => Some((attribute, &**getter)),
                _ => None,
            }
        })
    }
}

impl<K: Mutators> fmt::Debug for MethodSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.method_names()).finish()
    }
}

type SharedMethodSet = Arc<dyn Any + Send + Sync>;

static METHOD_SETS: OnceLock<RwLock<HashMap<TypeId, SharedMethodSet>>> = OnceLock::new();

/// The cached method set for specialization `K`, declaring it on first use.
#[must_use]
pub fn method_set<K: Mutators>() -> Arc<MethodSet<K>> {
    let cache = METHOD_SETS.get_or_init(Default::default);
    let id = TypeId::of::<K>();

    let cached = cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned();
    if let Some(shared) = cached
        && let Ok(set) = shared.downcast::<MethodSet<K>>()
    {
        return set;
    }

    // Declared outside the lock: a declaration may touch other specializations.
    let built = MethodSet::<K>::declared();
    tracing::debug!(
        specialization = std::any::type_name::<K>(),
        methods = built.len(),
        "Method set declared"
    );
    let built: SharedMethodSet = Arc::new(built);

    let stored = Arc::clone(
        cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_insert(built),
    );
    stored
        .downcast::<MethodSet<K>>()
        .unwrap_or_else(|_| Arc::new(MethodSet::declared()))
}
