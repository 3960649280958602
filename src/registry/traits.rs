//! Common trait for registries keyed by handle.

/// Common trait for registries that map opaque handles to records.
///
/// # Type Parameters
///
/// * `K` - The handle type (copyable, compared by identity)
/// * `V` - The type of record stored in the registry
///
/// # Example
///
/// ```
/// use spritefx::bitmap::Bitmap;
/// use spritefx::registry::{Registry, TransformRegistry};
/// use spritefx::scene::SpriteId;
///
/// let mut registry = TransformRegistry::new();
/// registry.resolve(SpriteId(7), &Bitmap::new(2, 2));
///
/// assert!(registry.contains(SpriteId(7)));
/// assert_eq!(registry.len(), 1);
/// ```
pub trait Registry<K: Copy, V> {
    /// Check if a record exists for the handle.
    fn contains(&self, key: K) -> bool;

    /// Get the record for a handle.
    ///
    /// Returns `None` if the handle has never been resolved.
    fn get(&self, key: K) -> Option<&V>;

    /// Get the number of records in the registry.
    fn len(&self) -> usize;

    /// Check if the registry is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles with a record, in ascending order.
    fn keys(&self) -> Vec<K>;
}
