//! Name-keyed, reference-counted resource cache.

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::ResourceResult;
use crate::loader::Loader;

/// Hands out shared handles to resources by name.
///
/// The cache only holds weak references: a resource lives exactly as long as
/// some handle to it does. Requesting a name whose handles have all been
/// dropped loads it again. Expired entries stay tracked until [`clean`] runs.
///
/// [`clean`]: ResourceCache::clean
///
/// # Example
///
/// ```
/// use orrery_resources::{Loader, ResourceCache, ResourceResult};
///
/// struct Echo;
///
/// impl Loader for Echo {
///     type Resource = String;
///     fn load(&self, name: &str) -> ResourceResult<String> {
///         Ok(name.to_uppercase())
///     }
/// }
///
/// let mut cache = ResourceCache::new(Echo);
/// let a = cache.get("foo").unwrap();
/// let b = cache.get("foo").unwrap();
/// assert!(std::rc::Rc::ptr_eq(&a, &b));
/// assert_eq!(*a, "FOO");
/// ```
pub struct ResourceCache<L: Loader> {
    entries: HashMap<String, Weak<L::Resource>>,
    loader: L,
}

impl<L: Loader> ResourceCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            entries: HashMap::new(),
            loader,
        }
    }

    /// Returns the live resource for `name`, loading it if necessary.
    pub fn get(&mut self, name: &str) -> ResourceResult<Rc<L::Resource>> {
        if let Some(live) = self.entries.get(name).and_then(Weak::upgrade) {
            return Ok(live);
        }
        let resource = Rc::new(self.loader.load(name)?);
        self.entries.insert(name.to_string(), Rc::downgrade(&resource));
        Ok(resource)
    }

    /// Drops bookkeeping for resources with no remaining handles.
    pub fn clean(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, weak| weak.strong_count() > 0);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Cleaned {} expired resource entries", removed);
        }
        removed
    }

    /// Whether `name` has ever been loaded and not yet cleaned.
    pub fn is_tracked(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether a live handle to `name` exists.
    pub fn is_active(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    pub fn tracked_count(&self) -> usize {
        self.entries.len()
    }

    pub fn active_count(&self) -> usize {
        self.entries
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}
