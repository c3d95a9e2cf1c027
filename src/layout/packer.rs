/// A contiguous run of images packed into one gallery row.
///
/// Rows are rebuilt from scratch on every packing pass and carry no identity
/// across runs; only the registry's `assigned` flags persist.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Image indices in packing order.
    pub items: Vec<usize>,
    /// Sum of the images' intrinsic widths, spacing excluded.
    pub row_width: f32,
    /// True if a subsequent image overflowed the budget and closed this row;
    /// false for the trailing open row still awaiting images.
    pub finished: bool,
}

impl Row {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Greedy left-to-right row packing at a fixed spacing.
///
/// Items are streamed in source order; a row closes the moment one more image
/// would no longer fit the container width. The final row is emitted open so
/// late-arriving images can still extend it.
#[derive(Debug, Clone)]
pub struct RowPacker {
    /// Spacing around each item in pixels.
    pub spacing: f32,
}

impl RowPacker {
    pub fn new(spacing: f32) -> Self {
        Self { spacing }
    }

    /// Partitions unassigned images into rows for the given container width.
    ///
    /// # Algorithm
    /// 1. Scan images once, in order, skipping those with unknown (zero)
    ///    width; they stay unassigned and are retried on the next pass.
    /// 2. Grow an open row while `row_width + w + 2*spacing < container_width`
    ///    still holds for the incoming image (strict: an exact fit overflows).
    /// 3. On overflow, flush the open row as finished and restart it with the
    ///    incoming image.
    /// 4. Whatever remains open at the end is emitted with `finished = false`.
    ///
    /// Pure with respect to registry state: `assigned` flags are the
    /// caller's to update from the returned finished rows.
    ///
    /// # Arguments
    /// * `images` - `(index, intrinsic_width)` pairs in registration order
    /// * `container_width` - the available width in pixels
    pub fn pack<I>(&self, images: I, container_width: f32) -> Vec<Row>
    where
        I: IntoIterator<Item = (usize, f32)>,
    {
        let mut rows = Vec::new();
        let mut pending_items: Vec<usize> = Vec::new();
        let mut row_width = 0.0f32;

        for (index, width) in images {
            // Not yet measured (unloaded or hidden as broken); leave for a
            // later pass without touching the accumulator.
            if width == 0.0 {
                continue;
            }
            if pending_items.is_empty() {
                pending_items.push(index);
                row_width = width;
                continue;
            }
            if row_width + width + 2.0 * self.spacing < container_width {
                pending_items.push(index);
                row_width += width;
            } else {
                rows.push(Row {
                    items: std::mem::take(&mut pending_items),
                    row_width,
                    finished: true,
                });
                pending_items.push(index);
                row_width = width;
            }
        }

        if !pending_items.is_empty() {
            rows.push(Row {
                items: pending_items,
                row_width,
                finished: false,
            });
        }

        rows
    }
}
