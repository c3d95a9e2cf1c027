//! Per-image layout state, keyed by a stable registration index.
//!
//! The registry is the only state that persists across layout passes: rows
//! are rebuilt from scratch every run, while `assigned` flags remember which
//! images already sit in a finished row.

/// Layout state for one registered image.
///
/// `R` is the host's opaque reference to the underlying element; the core
/// stores it and hands it back to the host, never interpreting it.
#[derive(Debug, Clone)]
pub struct ImageEntry<R> {
    /// Host-side reference for this image.
    pub handle: R,
    /// Natural pixel width at the fixed row height; 0.0 = not yet known.
    pub intrinsic_width: f32,
    /// True once the image sits in a finished row.
    pub assigned: bool,
}

/// Ordered store of every image in the gallery.
///
/// Indices are registration ordinals: assigned once, never reused, and equal
/// to source order. Mutators addressed at an unknown index are silent no-ops,
/// since a stale index can legitimately arrive from a callback queued before
/// the image went away.
#[derive(Debug, Default)]
pub struct ImageRegistry<R> {
    entries: Vec<ImageEntry<R>>,
}

impl<R> ImageRegistry<R> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers a new image and returns its index.
    pub fn register(&mut self, handle: R) -> usize {
        self.entries.push(ImageEntry {
            handle,
            intrinsic_width: 0.0,
            assigned: false,
        });
        self.entries.len() - 1
    }

    /// Updates an image's intrinsic width. No-op on unknown index.
    pub fn set_width(&mut self, index: usize, width: f32) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.intrinsic_width = width;
        }
    }

    /// Marks an image as placed in a finished row. No-op on unknown index.
    pub fn set_assigned(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.assigned = true;
        }
    }

    /// Clears every `assigned` flag (container-width change).
    pub fn reset_assignments(&mut self) {
        for entry in &mut self.entries {
            entry.assigned = false;
        }
    }

    /// Images not yet placed in a finished row, in registration order.
    pub fn unassigned(&self) -> impl Iterator<Item = (usize, &ImageEntry<R>)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.assigned)
    }

    pub fn get(&self, index: usize) -> Option<&ImageEntry<R>> {
        self.entries.get(index)
    }

    /// The intrinsic width recorded for an image, 0.0 if unknown index.
    pub fn width(&self, index: usize) -> f32 {
        self.entries
            .get(index)
            .map(|entry| entry.intrinsic_width)
            .unwrap_or(0.0)
    }

    pub fn handle(&self, index: usize) -> Option<&R> {
        self.entries.get(index).map(|entry| &entry.handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_assigns_sequential_indices() {
        let mut registry = ImageRegistry::new();
        assert_eq!(registry.register("a"), 0);
        assert_eq!(registry.register("b"), 1);
        assert_eq!(registry.register("c"), 2);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.handle(1), Some(&"b"));
    }

    #[test]
    fn new_entries_start_unmeasured_and_unassigned() {
        let mut registry = ImageRegistry::new();
        registry.register(());
        let entry = registry.get(0).unwrap();
        assert_eq!(entry.intrinsic_width, 0.0);
        assert!(!entry.assigned);
    }

    #[test]
    fn unknown_index_mutators_are_noops() {
        let mut registry = ImageRegistry::new();
        registry.register(());
        registry.set_width(5, 100.0);
        registry.set_assigned(5);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.width(5), 0.0);
    }

    #[test]
    fn unassigned_preserves_registration_order() {
        let mut registry = ImageRegistry::new();
        for _ in 0..4 {
            registry.register(());
        }
        registry.set_assigned(1);
        registry.set_assigned(2);

        let indices: Vec<usize> = registry.unassigned().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 3]);
    }

    #[test]
    fn reset_assignments_clears_all_flags() {
        let mut registry = ImageRegistry::new();
        for _ in 0..3 {
            registry.register(());
        }
        registry.set_assigned(0);
        registry.set_assigned(2);
        registry.reset_assignments();

        let indices: Vec<usize> = registry.unassigned().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
