//! Boundary toward the rendering host.
//!
//! The core never touches a real document: measuring an element, applying a
//! computed width, hiding a broken image are all delegated through this
//! trait. The host also owns the event loop; it pushes resize and
//! image-ready notifications into the controller and pumps its timers.

use crate::config::GalleryConfig;

/// How the host learns that image data has arrived.
///
/// Resolved once at controller init and never re-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadCapability {
    /// Per-image notifications as each image lazy-loads; the controller
    /// re-layouts incrementally.
    Lazy,
    /// One notification once every image has loaded (or failed).
    Batch,
    /// No load signaling at all. The controller runs once immediately and
    /// never sees late images; degraded but functional.
    None,
}

/// Rendering-side collaborator of the layout controller.
///
/// `Handle` is whatever the host uses to address one image element; the core
/// stores handles in the registry and hands them back, nothing more.
pub trait GalleryHost {
    type Handle;

    /// The images currently present, in source order.
    fn discover(&mut self) -> Vec<Self::Handle>;

    /// Current inner width of the gallery container.
    fn container_width(&mut self) -> f32;

    /// Measures an image's natural width at the configured fixed row height,
    /// after clearing any sizing override a previous layout applied.
    /// Returns 0.0 while the image is not yet measurable.
    fn intrinsic_width(&mut self, handle: &Self::Handle) -> f32;

    /// Applies baseline presentation: fixed image height, zero-font-size
    /// container, inline-block items.
    fn apply_baseline(&mut self, config: &GalleryConfig);

    /// Sets an item's outer box to a percentage of the container width.
    fn apply_item_style(&mut self, handle: &Self::Handle, width_percent: f32);

    /// Makes the image fill its item box: 100% width, automatic height.
    fn apply_image_style(&mut self, handle: &Self::Handle);

    /// Hides an image whose load failed and zeroes its spacing contribution.
    fn mark_broken(&mut self, handle: &Self::Handle);

    /// Which load-signaling capability is available.
    fn load_capability(&mut self) -> LoadCapability;
}
