//! galleria — justified multi-row gallery layout.
//!
//! Packs images of known aspect ratio into rows that exactly fill a container
//! width at a fixed spacing, rescaling each finished row proportionally. The
//! crate is rendering-agnostic: hosts implement [`GalleryHost`] to measure
//! and style real elements, push resize / image-ready notifications into the
//! [`GalleryController`], and pump its debounce timers from their event loop.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod host;
pub mod layout;
pub mod measure;
pub mod registry;

pub use config::{ConfigError, GalleryConfig};
pub use controller::{GalleryController, GalleryState};
pub use host::{GalleryHost, LoadCapability};
pub use layout::{PackCache, Row, RowPacker, RowScaler, ScaledItem, ScaledRow};
pub use registry::{ImageEntry, ImageRegistry};
