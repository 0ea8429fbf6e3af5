//! Primitive registry - named bindings grouped by host module
//!
//! Design: insert-only, read-mostly table behind a `parking_lot::RwLock`.
//! Lookups clone the `Arc<Binding>` out, so the lock is never held while a
//! native target runs. The table itself is created once, on `init()` or on
//! the first registration.
//!
//! A process-wide instance lives behind `global()`; the free functions
//! `register_primitive`, `invoke_primitive` and `lookup_primitive` address it.


use crate::binding::{Binding, Target};
use crate::codec::{Codec, TypeCatalog, TypeResolver};
use crate::config::{BridgeConfig, CollisionPolicy};
use crate::dispatch;
use crate::errors::BridgeError;
use crate::logging;
use crate::value::DynValue;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type Table = HashMap<String, HashMap<String, Arc<Binding>>>;

/// Invocation counters for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvocationStats {
    pub calls_made: usize,
    pub arity_errors: usize,
    pub marshaling_errors: usize,
    pub native_errors: usize,
}

#[derive(Default)]
struct Counters {
    calls_made: AtomicUsize,
    arity_errors: AtomicUsize,
    marshaling_errors: AtomicUsize,
    native_errors: AtomicUsize,
}

impl Counters {
    fn record(&self, result: &Result<DynValue, BridgeError>) {
        self.calls_made.fetch_add(1, Ordering::Relaxed);
        let counter = match result {
            Ok(_) => return,
            Err(BridgeError::ArityMismatch { .. }) => &self.arity_errors,
            Err(BridgeError::ArgumentTypeMismatch { .. }) | Err(BridgeError::ResultOutOfRange { .. }) => {
                &self.marshaling_errors
            }
            Err(BridgeError::Native(_)) => &self.native_errors,
            Err(_) => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> InvocationStats {
        InvocationStats {
            calls_made: self.calls_made.load(Ordering::Relaxed),
            arity_errors: self.arity_errors.load(Ordering::Relaxed),
            marshaling_errors: self.marshaling_errors.load(Ordering::Relaxed),
            native_errors: self.native_errors.load(Ordering::Relaxed),
        }
    }
}

/// Table of registered primitives plus the codec used to call them
pub struct Registry {
    codec: Codec,
    config: BridgeConfig,
    table: OnceCell<RwLock<Table>>,
    counters: Counters,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Arc::new(TypeCatalog::new()))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .field("primitives", &self.len())
            .finish()
    }
}

impl Registry {
    pub fn new(resolver: Arc<dyn TypeResolver>) -> Self {
        Self::with_config(resolver, BridgeConfig::default())
    }

    pub fn with_config(resolver: Arc<dyn TypeResolver>, config: BridgeConfig) -> Self {
        Self {
            codec: Codec::new(resolver),
            config,
            table: OnceCell::new(),
            counters: Counters::default(),
        }
    }

    /// Create the table. Repeated calls keep existing entries.
    pub fn init(&self) {
        self.table();
    }

    pub fn is_initialized(&self) -> bool {
        self.table.get().is_some()
    }

    fn table(&self) -> &RwLock<Table> {
        self.table.get_or_init(|| {
            logging::log_registry_init();
            RwLock::new(HashMap::new())
        })
    }

    #[inline]
    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    #[inline]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Module used by `define_primitive` and unqualified registrations
    pub fn default_module(&self) -> &str {
        &self.config.default_module
    }

    /// Insert a binding under `(module, name)`
    pub fn register(&self, binding: Binding) -> Result<Arc<Binding>, BridgeError> {
        let binding = Arc::new(binding);
        let mut table = self.table().write();
        let names = table.entry(binding.module().to_string()).or_default();

        if names.contains_key(binding.name()) {
            match self.config.on_collision {
                CollisionPolicy::Reject => {
                    logging::log_collision(binding.module(), binding.name(), false);
                    return Err(BridgeError::NameCollision {
                        module: binding.module().to_string(),
                        name: binding.name().to_string(),
                    });
                }
                CollisionPolicy::Replace => {
                    logging::log_collision(binding.module(), binding.name(), true);
                }
            }
        }

        names.insert(binding.name().to_string(), Arc::clone(&binding));
        logging::log_register(binding.module(), binding.name(), binding.signature());
        Ok(binding)
    }

    /// Build and insert a binding from its parts
    pub fn register_target(
        &self,
        module: impl Into<String>,
        name: impl Into<String>,
        target: Target,
    ) -> Result<Arc<Binding>, BridgeError> {
        self.register(Binding::new(module, name, target))
    }

    pub fn lookup(&self, module: &str, name: &str) -> Result<Arc<Binding>, BridgeError> {
        self.table
            .get()
            .and_then(|table| table.read().get(module).and_then(|names| names.get(name)).cloned())
            .ok_or_else(|| BridgeError::UnknownBinding {
                module: module.to_string(),
                name: name.to_string(),
            })
    }

    /// Look up and call a primitive
    pub fn invoke(&self, module: &str, name: &str, args: &[DynValue]) -> Result<DynValue, BridgeError> {
        let binding = self.lookup(module, name)?;
        let result = dispatch::invoke(&self.codec, &binding, args);
        self.counters.record(&result);
        result
    }

    pub fn contains(&self, module: &str, name: &str) -> bool {
        self.table
            .get()
            .is_some_and(|table| table.read().get(module).is_some_and(|names| names.contains_key(name)))
    }

    /// Total number of registered primitives
    pub fn len(&self) -> usize {
        self.table
            .get()
            .map_or(0, |table| table.read().values().map(HashMap::len).sum())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Module names, sorted
    pub fn modules(&self) -> Vec<String> {
        let Some(table) = self.table.get() else {
            return Vec::new();
        };
        let mut modules: Vec<String> = table.read().keys().cloned().collect();
        modules.sort_unstable();
        modules
    }

    /// Primitive names registered in `module`, sorted
    pub fn primitives_in(&self, module: &str) -> Vec<String> {
        let Some(table) = self.table.get() else {
            return Vec::new();
        };
        let mut names: Vec<String> = table
            .read()
            .get(module)
            .map(|names| names.keys().cloned().collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    pub fn stats(&self) -> InvocationStats {
        self.counters.snapshot()
    }
}

static GLOBAL: Lazy<Registry> = Lazy::new(|| {
    let config = BridgeConfig::from_env().unwrap_or_else(|err| {
        logging::warn!(error = %err, "Falling back to default bridge config");
        BridgeConfig::default()
    });
    Registry::with_config(TypeCatalog::shared(), config)
});

/// Process-wide registry, resolving type names through `TypeCatalog::shared()`
pub fn global() -> &'static Registry {
    &GLOBAL
}

pub fn register_primitive(binding: Binding) -> Result<Arc<Binding>, BridgeError> {
    global().register(binding)
}

pub fn invoke_primitive(module: &str, name: &str, args: &[DynValue]) -> Result<DynValue, BridgeError> {
    global().invoke(module, name, args)
}

pub fn lookup_primitive(module: &str, name: &str) -> Result<Arc<Binding>, BridgeError> {
    global().lookup(module, name)
}
