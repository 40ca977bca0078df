//! Class functions: callables shared by every attribute bag.
//!
//! The process-wide table lives behind [`ClassFunctions::global`]. It starts
//! empty on first use, only grows, and is never torn down.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use magic_types::Value;

/// A registered class function. It has no receiver.
pub type ClassFn = dyn Fn(&[Value]) -> Option<Value> + Send + Sync;

#[derive(Default)]
pub struct ClassFunctions {
    functions: RwLock<HashMap<String, Arc<ClassFn>>>,
}

impl ClassFunctions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table every [`AttributeBag`](crate::AttributeBag) specialization shares.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ClassFunctions> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Register `function` under `name`, replacing any earlier registration.
    pub fn register<F>(&self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> Option<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(function = %name, "Registering class function");
        self.functions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::new(function));
    }

    /// Invoke `name`. Unknown names return `None`.
    ///
    /// The table lock is released before the function runs, so a class
    /// function may register or call others.
    pub fn call(&self, name: &str, args: &[Value]) -> Option<Value> {
        let function = self
            .functions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(Arc::clone);
        match function {
            Some(function) => function(args),
            None => {
                tracing::trace!(function = name, "No class function");
                None
            }
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.functions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ClassFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let functions = self
            .functions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<&str> = functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ClassFunctions")
            .field("functions", &names)
            .finish()
    }
}
