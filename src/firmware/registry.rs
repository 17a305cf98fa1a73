//! Per-run table of known behaviors and their arity.
//!
//! The registry starts with every built-in behavior and is extended with the
//! document's hold-taps and macros before any layer is formatted. The first
//! registration of a name wins; a later registration with a different arity is
//! reported as a conflict and ignored.

use crate::firmware::behaviors::BUILTIN_BEHAVIORS;
use std::collections::HashMap;

/// Where a behavior was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorOrigin {
    /// Shipped with the firmware
    Builtin,
    /// User macro from the document
    UserMacro,
    /// User hold-tap from the document
    UserHoldTap,
}

/// Registered behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorDescriptor {
    /// Behavior reference including the sigil (e.g. "&hm_l")
    pub name: String,
    /// Number of binding cells (0, 1 or 2)
    pub arity: u8,
    /// Declaration origin
    pub origin: BehaviorOrigin,
}

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// Name was new and is now registered
    Added,
    /// Same name with the same arity was already registered
    AlreadyPresent,
    /// Same name with a different arity; the existing entry was kept
    Conflict {
        /// The entry that stays in the registry
        existing: BehaviorDescriptor,
    },
}

/// Behavior registry owned by one compile run.
#[derive(Debug, Clone, Default)]
pub struct BehaviorRegistry {
    entries: HashMap<String, BehaviorDescriptor>,
}

impl BehaviorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with the built-in behaviors.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, kind) in BUILTIN_BEHAVIORS {
            registry.register(name, kind.arity(), BehaviorOrigin::Builtin);
        }
        registry
    }

    /// Registers a behavior; first registration wins.
    pub fn register(&mut self, name: &str, arity: u8, origin: BehaviorOrigin) -> Registration {
        match self.entries.get(name) {
            Some(existing) if existing.arity == arity => Registration::AlreadyPresent,
            Some(existing) => Registration::Conflict {
                existing: existing.clone(),
            },
            None => {
                self.entries.insert(
                    name.to_string(),
                    BehaviorDescriptor {
                        name: name.to_string(),
                        arity,
                        origin,
                    },
                );
                Registration::Added
            }
        }
    }

    /// Arity of a registered behavior.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<u8> {
        self.entries.get(name).map(|d| d.arity)
    }

    /// Full descriptor of a registered behavior.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BehaviorDescriptor> {
        self.entries.get(name)
    }

    /// Number of registered behaviors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
