//! Row layout core for the justified gallery.
//!
//! This module provides:
//! - `RowPacker` - Greedy packing of images into rows at a fixed height
//! - `RowScaler` - Proportional rescaling of finished rows to the container
//! - `PackCache` - Memoization of full packing passes

pub mod cache;
pub mod packer;
pub mod scaler;

pub use cache::PackCache;
pub use packer::{Row, RowPacker};
pub use scaler::{RowScaler, ScaledItem, ScaledRow};
