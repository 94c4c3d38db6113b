use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Concurrency-safe set of discovered canonical URLs
///
/// The set only grows. Each entry remembers the page the URL was first
/// discovered on (`None` for the seed) so a path can be walked back from any
/// marked node.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: Mutex<HashMap<String, Option<String>>>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as seen
    ///
    /// Returns true iff this call is the first to mark `url`. The check and the
    /// insert happen under one lock acquisition.
    pub fn test_and_mark(&self, url: &str) -> bool {
        self.test_and_mark_from(url, None)
    }

    /// Like [`VisitedSet::test_and_mark`], recording `parent` as the page that
    /// led to `url` when the mark is new
    pub fn test_and_mark_from(&self, url: &str, parent: Option<&str>) -> bool {
        let mut seen = self.lock();
        if seen.contains_key(url) {
            return false;
        }
        seen.insert(url.to_string(), parent.map(str::to_string));
        true
    }

    /// Returns true if `url` has been marked
    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains_key(url)
    }

    /// Number of marked URLs
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walks discovery parents back from `url` to the seed
    ///
    /// Returns the chain in forward order (seed first), or an empty vector if
    /// `url` was never marked.
    pub fn path_to(&self, url: &str) -> Vec<String> {
        let seen = self.lock();
        let mut path = Vec::new();
        let mut current = Some(url.to_string());

        while let Some(node) = current {
            let Some(parent) = seen.get(&node) else {
                break;
            };
            current = parent.clone();
            path.push(node);
            // Parents are always marked before their children, so the chain
            // cannot be longer than the set itself.
            if path.len() > seen.len() {
                break;
            }
        }

        path.reverse();
        path
    }

    // Entries are only ever inserted, so a poisoned map is still consistent.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Option<String>>> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
