use core::num::NonZeroU64;
use std::{collections::HashMap, sync::Arc};

#[cfg(feature = "parking-lot")]
use parking_lot::{Mutex, MutexGuard};
#[cfg(not(feature = "parking-lot"))]
use std::sync::{Mutex, MutexGuard};

use crate::{error::Result, sequence::AtomicSequence};

type Counters = HashMap<String, Arc<AtomicSequence>>;

/// A set of named [`AtomicSequence`] counters.
///
/// This plays the role of a database's sequence catalog: callers address a
/// counter by name and every caller using the same name shares one counter.
/// The registry lock is only taken to look a counter up; drawing values goes
/// straight to the lock-free counter.
///
/// # Example
///
/// ```
/// use core::num::NonZeroU64;
/// use unique_id::sequence::{SequenceRegistry, SequenceSource};
///
/// let registry = SequenceRegistry::new();
/// let modulus = NonZeroU64::new(1024).unwrap();
///
/// let a = registry.get_or_create("orders", modulus).unwrap();
/// let b = registry.get_or_create("orders", modulus).unwrap();
/// assert_eq!(a.next_value(), 0);
/// assert_eq!(b.next_value(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SequenceRegistry {
    counters: Mutex<Counters>,
}

impl SequenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counter registered under `name`, creating one that wraps
    /// at `modulus` if none exists.
    ///
    /// An existing counter keeps the modulus it was created with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if another thread panicked while holding
    /// the registry lock. Never fails with the `parking-lot` feature.
    ///
    /// [`Error::LockPoisoned`]: crate::error::Error
    pub fn get_or_create(&self, name: &str, modulus: NonZeroU64) -> Result<Arc<AtomicSequence>> {
        let mut counters = self.lock()?;
        if let Some(counter) = counters.get(name) {
            return Ok(Arc::clone(counter));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(name, modulus = modulus.get(), "creating sequence");
        let counter = Arc::new(AtomicSequence::new(modulus));
        counters.insert(name.to_owned(), Arc::clone(&counter));
        Ok(counter)
    }

    /// Returns the counter registered under `name`, if any.
    ///
    /// # Errors
    ///
    /// See [`SequenceRegistry::get_or_create`].
    pub fn get(&self, name: &str) -> Result<Option<Arc<AtomicSequence>>> {
        Ok(self.lock()?.get(name).cloned())
    }

    /// Drops the counter registered under `name`. Holders of the counter keep
    /// using it; the next lookup creates a fresh one.
    ///
    /// # Errors
    ///
    /// See [`SequenceRegistry::get_or_create`].
    pub fn remove(&self, name: &str) -> Result<Option<Arc<AtomicSequence>>> {
        Ok(self.lock()?.remove(name))
    }

    /// Number of registered counters.
    ///
    /// # Errors
    ///
    /// See [`SequenceRegistry::get_or_create`].
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Whether no counters are registered.
    ///
    /// # Errors
    ///
    /// See [`SequenceRegistry::get_or_create`].
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    #[cfg(feature = "parking-lot")]
    fn lock(&self) -> Result<MutexGuard<'_, Counters>> {
        Ok(self.counters.lock())
    }

    #[cfg(not(feature = "parking-lot"))]
    fn lock(&self) -> Result<MutexGuard<'_, Counters>> {
        Ok(self.counters.lock()?)
    }
}
