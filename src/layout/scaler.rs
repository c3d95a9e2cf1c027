use crate::layout::packer::Row;

/// Final dimensions for one image of a justified row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledItem {
    /// Registry index of the image.
    pub index: usize,
    /// Pixel width after proportional rescaling to the row's target width.
    pub scaled_px: f32,
    /// Width of the item's outer box (image plus its spacing allowance) as a
    /// percentage of the container, so the style survives small resizes
    /// without recomputation. The image renders at 100% of the box with
    /// height auto-derived to keep its aspect ratio.
    pub width_percent: f32,
}

/// A finished row with every image rescaled to exactly fill the container.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledRow {
    pub items: Vec<ScaledItem>,
    /// Pixel budget the row's images were scaled into: the container width
    /// minus the spacing reserved for every item.
    pub target_width: f32,
}

/// Proportional rescaling of finished rows.
///
/// Each image keeps its share of the row's unscaled width, so width and
/// height shrink or grow together and aspect ratios are preserved. Unfinished
/// rows are never scaled; they keep the fixed row height until they close.
#[derive(Debug, Clone)]
pub struct RowScaler {
    /// Spacing around each item in pixels.
    pub spacing: f32,
}

impl RowScaler {
    pub fn new(spacing: f32) -> Self {
        Self { spacing }
    }

    /// Computes final widths for a finished row.
    ///
    /// `width_of` resolves an image index to its intrinsic width (registry
    /// lookup). The scaled pixel widths sum to
    /// `container_width - item_count * 2 * spacing` up to float rounding, so
    /// the row occupies the container width exactly; equivalently the
    /// per-item box percentages sum to 100.
    ///
    /// `row.row_width` is never zero here: the packer only builds rows from
    /// images with nonzero intrinsic width.
    pub fn scale<F>(&self, row: &Row, width_of: F, container_width: f32) -> ScaledRow
    where
        F: Fn(usize) -> f32,
    {
        debug_assert!(row.finished, "only finished rows are scaled");
        let target_width = container_width - row.item_count() as f32 * 2.0 * self.spacing;

        let items = row
            .items
            .iter()
            .map(|&index| {
                let scaled_px = width_of(index) / row.row_width * target_width;
                let width_percent = (scaled_px + 2.0 * self.spacing) / container_width * 100.0;
                ScaledItem {
                    index,
                    scaled_px,
                    width_percent,
                }
            })
            .collect();

        ScaledRow {
            items,
            target_width,
        }
    }
}
