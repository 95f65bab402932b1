#![forbid(unsafe_code)]

//! Ordered handler→factory maps and the process-wide registry.
//!
//! # Design
//!
//! A [`HandlerMap`] keeps registrations in insertion order and indexes them
//! by [`HandlerKey`]; re-registering a key swaps the factory in place and
//! keeps the slot's position.
//!
//! [`GlobalRegistry`] publishes immutable `HandlerMap` snapshots through
//! `ArcSwap`. Lookups load the current snapshot without locking. Writers
//! copy the map, apply the change and swap it in (read-copy-update), so
//! concurrent writers never lose each other's registrations.
//!
//! # Invariants
//!
//! 1. At most one entry per key.
//! 2. Lookup scans entries in insertion order; the first match wins.
//! 3. A lookup never observes a half-applied mutation.

use std::fmt;
use std::sync::{Arc, OnceLock};

use ahash::AHashMap;
use arc_swap::ArcSwap;
use tracing::warn;

use super::NodeFactory;
use crate::element::ObservableElement;
use crate::handler::{ElementHandler, HandlerKey};

pub type SharedHandler = Arc<dyn ElementHandler>;
pub type SharedFactory = Arc<dyn NodeFactory>;

/// Resolution tier, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    User,
    Global,
    Default,
    Fallback,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Global => "global",
            Self::Default => "default",
            Self::Fallback => "fallback",
        })
    }
}

/// Insertion-ordered map from handler to factory.
#[derive(Clone, Default)]
pub struct HandlerMap {
    entries: Vec<(SharedHandler, SharedFactory)>,
    index: AHashMap<HandlerKey, usize>,
}

impl HandlerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` for `handler`. Returns the factory it replaced.
    pub fn insert(
        &mut self,
        handler: SharedHandler,
        factory: SharedFactory,
    ) -> Option<SharedFactory> {
        let key = handler.key();
        match self.index.get(&key) {
            Some(&slot) => {
                let previous = std::mem::replace(&mut self.entries[slot], (handler, factory));
                Some(previous.1)
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((handler, factory));
                None
            }
        }
    }

    /// Remove the registration for `key`, keeping the order of the rest.
    pub fn remove(&mut self, key: &HandlerKey) -> Option<SharedFactory> {
        let slot = self.index.remove(key)?;
        let (_, factory) = self.entries.remove(slot);
        for position in self.index.values_mut() {
            if *position > slot {
                *position -= 1;
            }
        }
        Some(factory)
    }

    #[must_use]
    pub fn get(&self, key: &HandlerKey) -> Option<SharedFactory> {
        self.index
            .get(key)
            .map(|&slot| Arc::clone(&self.entries[slot].1))
    }

    #[must_use]
    pub fn contains(&self, key: &HandlerKey) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in registration order.
    #[must_use]
    pub fn keys(&self) -> Vec<HandlerKey> {
        self.entries.iter().map(|(h, _)| h.key()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First factory whose handler accepts `element`.
    ///
    /// More than one match in a tier is a configuration error; it is logged
    /// as `resolver.ambiguous` and the earliest registration is used.
    #[must_use]
    pub fn lookup(&self, element: &ObservableElement, tier: Tier) -> Option<SharedFactory> {
        let mut matches = self.entries.iter().filter(|(h, _)| h.handles(element));
        let (winner, factory) = matches.next()?;
        let others: Vec<String> = matches.map(|(h, _)| h.key().to_string()).collect();
        if !others.is_empty() {
            warn!(
                message = "resolver.ambiguous",
                %tier,
                field = element.name(),
                winner = %winner.key(),
                shadowed = ?others,
            );
        }
        Some(Arc::clone(factory))
    }
}

impl fmt::Debug for HandlerMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter().map(|(h, _)| h.key())).finish()
    }
}

/// Process-wide handler→factory registrations.
///
/// # Lifecycle
///
/// The shared instance ([`GlobalRegistry::shared`]) is created on first use
/// and lives for the rest of the process. Register global factories during
/// startup; every [`DelegateFactory`] that uses the registry, including ones
/// built before the registration, sees the change on its next lookup.
///
/// [`DelegateFactory`]: super::DelegateFactory
#[derive(Default)]
pub struct GlobalRegistry {
    map: ArcSwap<HandlerMap>,
}

static SHARED: OnceLock<Arc<GlobalRegistry>> = OnceLock::new();

impl GlobalRegistry {
    /// A private, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::new())))
    }

    /// Register `factory` for `handler`. Returns the factory it replaced.
    pub fn insert(&self, handler: SharedHandler, factory: SharedFactory) -> Option<SharedFactory> {
        let key = handler.key();
        let previous = self.map.rcu(|current| {
            let mut next = HandlerMap::clone(current);
            next.insert(Arc::clone(&handler), Arc::clone(&factory));
            next
        });
        previous.get(&key)
    }

    pub fn remove(&self, key: &HandlerKey) -> Option<SharedFactory> {
        let previous = self.map.rcu(|current| {
            let mut next = HandlerMap::clone(current);
            next.remove(key);
            next
        });
        previous.get(key)
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.map.store(Arc::new(HandlerMap::new()));
    }

    /// The current registrations.
    #[must_use]
    pub fn snapshot(&self) -> Arc<HandlerMap> {
        self.map.load_full()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.load().is_empty()
    }
}

impl fmt::Debug for GlobalRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GlobalRegistry").field(&*self.map.load()).finish()
    }
}
