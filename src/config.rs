use std::time::Duration;

use thiserror::Error;

/// Default fixed row height in pixels.
pub const DEFAULT_ROW_HEIGHT: f32 = 200.0;

/// Default spacing around each item in pixels.
pub const DEFAULT_SPACING: f32 = 5.0;

/// Default quiet period for resize / image-ready debouncing.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Public configuration surface of a gallery instance.
///
/// The selector and marker fields are opaque to the core; they are carried for
/// the host glue, which uses them to find items and tag laid-out images.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Selector the host uses to find item containers (default: "div").
    pub item_selector: String,
    /// Selector the host uses to find images inside items (default: "img").
    pub image_selector: String,
    /// Class the host adds to an image once its style has been applied.
    pub loaded_marker_class: String,
    /// Fixed row height in pixels before justification (default: 200).
    pub row_height: f32,
    /// Spacing around each item in pixels (default: 5).
    pub spacing: f32,
    /// Quiet period before a burst of resize or image-ready events
    /// collapses into one re-layout (default: 500 ms).
    pub quiet_period: Duration,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            item_selector: "div".to_string(),
            image_selector: "img".to_string(),
            loaded_marker_class: "galleria_loaded".to_string(),
            row_height: DEFAULT_ROW_HEIGHT,
            spacing: DEFAULT_SPACING,
            quiet_period: DEFAULT_QUIET_PERIOD,
        }
    }
}

impl GalleryConfig {
    /// Checks the geometry fields for values the layout math cannot take.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(ConfigError::RowHeight(self.row_height));
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(ConfigError::Spacing(self.spacing));
        }
        Ok(())
    }
}

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("row height must be a positive finite number, got {0}")]
    RowHeight(f32),
    #[error("spacing must be a non-negative finite number, got {0}")]
    Spacing(f32),
}
