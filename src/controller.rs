//! Orchestration of the justified layout run cycle.
//!
//! The controller owns the only mutable orchestration state in the crate:
//! - the image registry and the rows accumulated so far
//! - the cached container width
//! - one debounce timer per event class (resize, image-ready)
//!
//! A resize discards everything and repacks from scratch; newly arrived image
//! data only extends the layout, because images already sitting in finished
//! rows stay assigned and are skipped by the next packing pass.

use std::time::Instant;

use tracing::{debug, warn};

use crate::config::GalleryConfig;
use crate::debounce::DebounceTimer;
use crate::host::{GalleryHost, LoadCapability};
use crate::layout::{PackCache, Row, RowPacker, RowScaler, ScaledRow};
use crate::registry::ImageRegistry;

/// Lifecycle of a controller instance.
///
/// `LaidOut` loops back into itself on every re-run; there is no terminal
/// state short of dropping the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryState {
    /// Constructed, images not yet registered.
    Idle,
    /// Images registered and baseline presentation applied.
    Initialized,
    /// At least one layout pass has completed.
    LaidOut,
}

/// Drives packing and scaling over a host's images and pushes the computed
/// styles back to the host.
pub struct GalleryController<H: GalleryHost> {
    config: GalleryConfig,
    host: H,
    registry: ImageRegistry<H::Handle>,
    packer: RowPacker,
    scaler: RowScaler,
    cache: PackCache,
    state: GalleryState,
    capability: LoadCapability,
    container_width: f32,
    /// Width reported by the latest resize notification, applied when the
    /// resize timer fires.
    pending_width: Option<f32>,
    finished_rows: Vec<Row>,
    scaled_rows: Vec<ScaledRow>,
    trailing: Option<Row>,
    resize_timer: DebounceTimer,
    ready_timer: DebounceTimer,
    on_row_applied: Option<Box<dyn FnMut(&ScaledRow)>>,
}

impl<H: GalleryHost> GalleryController<H> {
    pub fn new(config: GalleryConfig, host: H) -> Self {
        let resize_timer = DebounceTimer::new(config.quiet_period);
        let ready_timer = DebounceTimer::new(config.quiet_period);
        let packer = RowPacker::new(config.spacing);
        let scaler = RowScaler::new(config.spacing);
        Self {
            config,
            host,
            registry: ImageRegistry::new(),
            packer,
            scaler,
            cache: PackCache::new(),
            state: GalleryState::Idle,
            capability: LoadCapability::None,
            container_width: 0.0,
            pending_width: None,
            finished_rows: Vec::new(),
            scaled_rows: Vec::new(),
            trailing: None,
            resize_timer,
            ready_timer,
            on_row_applied: None,
        }
    }

    /// Registers a callback fired once per newly finished row, after its
    /// styles have been pushed to the host.
    pub fn on_row_applied(&mut self, callback: impl FnMut(&ScaledRow) + 'static) {
        self.on_row_applied = Some(Box::new(callback));
    }

    /// Registers the host's images, applies baseline presentation, resolves
    /// the load capability, and performs the first layout pass.
    pub fn init(&mut self) {
        for handle in self.host.discover() {
            self.registry.register(handle);
        }
        self.host.apply_baseline(&self.config);
        self.capability = self.host.load_capability();
        self.container_width = self.host.container_width();
        if self.capability == LoadCapability::None {
            warn!("no load signaling available; laying out once without incremental updates");
        }
        debug!(
            images = self.registry.len(),
            container_width = self.container_width,
            capability = ?self.capability,
            "gallery initialized"
        );
        self.state = GalleryState::Initialized;
        self.run();
    }

    /// One layout pass: measure unassigned images, pack them, scale and style
    /// every newly finished row. Idempotent for unchanged state; safe to call
    /// repeatedly and rapidly.
    pub fn run(&mut self) {
        if self.state == GalleryState::Idle {
            return;
        }

        // Refresh widths for everything not yet locked into a finished row.
        for index in 0..self.registry.len() {
            if self.registry.get(index).is_none_or(|entry| entry.assigned) {
                continue;
            }
            let width = match self.registry.handle(index) {
                Some(handle) => self.host.intrinsic_width(handle),
                None => continue,
            };
            self.registry.set_width(index, width);
        }

        let rows = self.pack_unassigned();

        self.trailing = None;
        let mut newly_finished = 0usize;
        for row in rows {
            if !row.finished {
                self.trailing = Some(row);
                continue;
            }
            for &index in &row.items {
                self.registry.set_assigned(index);
            }
            let scaled = self
                .scaler
                .scale(&row, |i| self.registry.width(i), self.container_width);
            for item in &scaled.items {
                if let Some(handle) = self.registry.handle(item.index) {
                    self.host.apply_item_style(handle, item.width_percent);
                    self.host.apply_image_style(handle);
                }
            }
            if let Some(callback) = self.on_row_applied.as_mut() {
                callback(&scaled);
            }
            self.finished_rows.push(row);
            self.scaled_rows.push(scaled);
            newly_finished += 1;
        }

        debug!(
            newly_finished,
            finished_total = self.finished_rows.len(),
            trailing = self.trailing.is_some(),
            container_width = self.container_width,
            "layout pass"
        );
        self.state = GalleryState::LaidOut;
    }

    /// A resize notification from the host. Ignored when the width did not
    /// actually change; otherwise (re)arms the resize timer, and the full
    /// reset happens when the quiet period elapses in `tick`.
    pub fn note_resize(&mut self, new_width: f32, now: Instant) {
        let last_observed = self.pending_width.unwrap_or(self.container_width);
        if new_width == last_observed {
            return;
        }
        self.pending_width = Some(new_width);
        self.resize_timer.trigger(now);
    }

    /// An image-ready notification from the host. (Re)arms the image-ready
    /// timer so a burst of near-simultaneous arrivals costs one layout pass.
    pub fn note_image_ready(&mut self, now: Instant) {
        // Without load signaling there is nothing to coalesce; stray
        // notifications are ignored rather than trusted.
        if self.capability == LoadCapability::None {
            return;
        }
        self.ready_timer.trigger(now);
    }

    /// Permanently excludes an image whose load failed: its width is pinned
    /// to zero and the host hides the element. The host must keep reporting
    /// zero width for it from `intrinsic_width` on.
    pub fn image_broken(&mut self, index: usize) {
        self.registry.set_width(index, 0.0);
        if let Some(handle) = self.registry.handle(index) {
            self.host.mark_broken(handle);
        }
    }

    /// Fires any due timer. Returns true if a layout pass ran. The host pumps
    /// this from its event loop.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut ran = false;
        if self.resize_timer.fire(now) {
            if let Some(new_width) = self.pending_width.take() {
                self.apply_resize(new_width);
                ran = true;
            }
        }
        // A resize pass already covered everything, including late images.
        let ready_due = self.ready_timer.fire(now);
        if ready_due && !ran {
            self.run();
            ran = true;
        }
        ran
    }

    /// Full reset: new width, all assignments cleared, all rows discarded,
    /// then a fresh pass over the complete image set.
    fn apply_resize(&mut self, new_width: f32) {
        debug!(
            old_width = self.container_width,
            new_width, "container resized, repacking from scratch"
        );
        self.container_width = new_width;
        self.registry.reset_assignments();
        self.finished_rows.clear();
        self.scaled_rows.clear();
        self.trailing = None;
        self.run();
    }

    /// Packs the current unassigned sequence. Full passes (no image assigned
    /// yet, i.e. init or right after a resize reset) are memoized in the pack
    /// cache; incremental passes bypass it.
    fn pack_unassigned(&mut self) -> Vec<Row> {
        let full_pass = !self.registry.is_empty()
            && self.registry.unassigned().count() == self.registry.len();

        if full_pass {
            let hash = PackCache::hash_widths(
                (0..self.registry.len()).map(|index| self.registry.width(index)),
            );
            if let Some(rows) = self.cache.get(self.container_width, hash) {
                debug!(rows = rows.len(), "pack cache hit");
                return rows;
            }
            let rows = self.packer.pack(
                self.registry
                    .unassigned()
                    .map(|(index, entry)| (index, entry.intrinsic_width)),
                self.container_width,
            );
            self.cache.set(self.container_width, hash, rows.clone());
            return rows;
        }

        self.packer.pack(
            self.registry
                .unassigned()
                .map(|(index, entry)| (index, entry.intrinsic_width)),
            self.container_width,
        )
    }

    pub fn state(&self) -> GalleryState {
        self.state
    }

    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    pub fn capability(&self) -> LoadCapability {
        self.capability
    }

    /// Finished rows accumulated since the last full reset.
    pub fn finished_rows(&self) -> &[Row] {
        &self.finished_rows
    }

    /// Scaled output parallel to `finished_rows`.
    pub fn scaled_rows(&self) -> &[ScaledRow] {
        &self.scaled_rows
    }

    /// The open trailing row, if the last pass left one.
    pub fn trailing_row(&self) -> Option<&Row> {
        self.trailing.as_ref()
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;
    use std::time::Duration;

    const QUIET: Duration = Duration::from_millis(500);

    /// In-memory host: handles are indices into a width table.
    struct TestHost {
        widths: Vec<f32>,
        container: f32,
        capability: LoadCapability,
        item_styles: HashMap<usize, f32>,
        images_styled: HashSet<usize>,
        broken: HashSet<usize>,
        baseline_applied: bool,
        measures: usize,
    }

    impl TestHost {
        fn new(widths: Vec<f32>, container: f32) -> Self {
            Self {
                widths,
                container,
                capability: LoadCapability::Lazy,
                item_styles: HashMap::new(),
                images_styled: HashSet::new(),
                broken: HashSet::new(),
                baseline_applied: false,
                measures: 0,
            }
        }
    }

    impl GalleryHost for TestHost {
        type Handle = usize;

        fn discover(&mut self) -> Vec<usize> {
            (0..self.widths.len()).collect()
        }

        fn container_width(&mut self) -> f32 {
            self.container
        }

        fn intrinsic_width(&mut self, handle: &usize) -> f32 {
            self.measures += 1;
            if self.broken.contains(handle) {
                0.0
            } else {
                self.widths[*handle]
            }
        }

        fn apply_baseline(&mut self, _config: &GalleryConfig) {
            self.baseline_applied = true;
        }

        fn apply_item_style(&mut self, handle: &usize, width_percent: f32) {
            self.item_styles.insert(*handle, width_percent);
        }

        fn apply_image_style(&mut self, handle: &usize) {
            self.images_styled.insert(*handle);
        }

        fn mark_broken(&mut self, handle: &usize) {
            self.broken.insert(*handle);
        }

        fn load_capability(&mut self) -> LoadCapability {
            self.capability
        }
    }

    fn controller(widths: Vec<f32>, container: f32) -> GalleryController<TestHost> {
        let mut controller =
            GalleryController::new(GalleryConfig::default(), TestHost::new(widths, container));
        controller.init();
        controller
    }

    #[test]
    fn init_runs_initial_layout() {
        let c = controller(vec![300.0, 400.0, 200.0, 500.0, 600.0], 1000.0);

        assert_eq!(c.state(), GalleryState::LaidOut);
        assert!(c.host().baseline_applied);

        let finished = c.finished_rows();
        assert_eq!(finished.len(), 2);
        assert_eq!(finished[0].items, vec![0, 1, 2]);
        assert_eq!(finished[1].items, vec![3]);
        assert_eq!(c.trailing_row().unwrap().items, vec![4]);

        // Styles reach finished-row images only; the open row stays unstyled.
        for index in 0..=3 {
            assert!(c.host().item_styles.contains_key(&index));
            assert!(c.host().images_styled.contains(&index));
        }
        assert!(!c.host().item_styles.contains_key(&4));
    }

    #[test]
    fn finished_row_percents_sum_to_one_hundred() {
        let c = controller(vec![300.0, 400.0, 200.0, 500.0, 600.0], 1000.0);

        for scaled in c.scaled_rows() {
            let sum: f32 = scaled.items.iter().map(|item| item.width_percent).sum();
            assert!((sum - 100.0).abs() < 1e-3, "row summed to {sum}");
        }
    }

    #[test]
    fn run_is_idempotent() {
        let mut c = controller(vec![300.0, 400.0, 200.0, 500.0, 600.0], 1000.0);

        let finished_before = c.finished_rows().to_vec();
        let scaled_before = c.scaled_rows().to_vec();
        let trailing_before = c.trailing_row().cloned();
        let styles_before = c.host().item_styles.clone();

        c.run();
        c.run();

        assert_eq!(c.finished_rows(), finished_before.as_slice());
        assert_eq!(c.scaled_rows(), scaled_before.as_slice());
        assert_eq!(c.trailing_row().cloned(), trailing_before);
        assert_eq!(c.host().item_styles, styles_before);
    }

    #[test]
    fn trailing_row_replaced_not_duplicated() {
        // Nothing overflows: one open row, nothing assigned, run after run.
        let mut c = controller(vec![100.0, 100.0], 1000.0);

        assert!(c.finished_rows().is_empty());
        assert_eq!(c.trailing_row().unwrap().items, vec![0, 1]);

        c.run();
        c.run();
        assert!(c.finished_rows().is_empty());
        assert_eq!(c.trailing_row().unwrap().items, vec![0, 1]);
    }

    #[test]
    fn late_images_extend_the_layout_incrementally() {
        let mut c = controller(vec![300.0, 400.0, 0.0, 0.0, 0.0], 1000.0);

        // Unmeasured images defer; the first two stay in an open row.
        assert!(c.finished_rows().is_empty());
        assert_eq!(c.trailing_row().unwrap().items, vec![0, 1]);

        // Widths resolve, the host signals, the burst coalesces into one run.
        let t0 = Instant::now();
        c.host_mut().widths[2] = 200.0;
        c.note_image_ready(t0);
        c.host_mut().widths[3] = 500.0;
        c.host_mut().widths[4] = 600.0;
        c.note_image_ready(t0 + Duration::from_millis(50));

        assert!(!c.tick(t0 + Duration::from_millis(500)));
        assert!(c.tick(t0 + Duration::from_millis(550)));

        let finished = c.finished_rows();
        assert_eq!(finished.len(), 2);
        assert_eq!(finished[0].items, vec![0, 1, 2]);
        assert_eq!(finished[1].items, vec![3]);
        assert_eq!(c.trailing_row().unwrap().items, vec![4]);
    }

    #[test]
    fn resize_resets_and_repacks_from_scratch() {
        let widths = vec![300.0, 400.0, 200.0, 500.0, 600.0];
        let mut c = controller(widths.clone(), 1000.0);

        let t0 = Instant::now();
        c.note_resize(600.0, t0);
        assert!(c.tick(t0 + QUIET));
        assert_eq!(c.container_width(), 600.0);

        // Equivalent to a fresh gallery at the new width.
        let fresh = controller(widths, 600.0);
        assert_eq!(c.finished_rows(), fresh.finished_rows());
        assert_eq!(c.scaled_rows(), fresh.scaled_rows());
        assert_eq!(c.trailing_row(), fresh.trailing_row());
    }

    #[test]
    fn shrinking_container_makes_narrower_rows() {
        let widths = vec![300.0, 400.0, 200.0, 500.0, 600.0];
        let mut c = controller(widths, 1000.0);
        assert_eq!(c.finished_rows()[0].items.len(), 3);

        let t0 = Instant::now();
        c.note_resize(600.0, t0);
        c.tick(t0 + QUIET);

        // 300+400+10 no longer fits 600; rows dissolve and repack narrower.
        assert_eq!(c.finished_rows()[0].items, vec![0]);
    }

    #[test]
    fn unchanged_width_resize_is_ignored() {
        let mut c = controller(vec![300.0, 400.0], 1000.0);
        let t0 = Instant::now();
        c.note_resize(1000.0, t0);
        assert!(!c.tick(t0 + QUIET));
    }

    #[test]
    fn resize_burst_debounces_to_the_last_width() {
        let mut c = controller(vec![300.0, 400.0, 200.0, 500.0, 600.0], 1000.0);
        let t0 = Instant::now();

        c.note_resize(800.0, t0);
        c.note_resize(700.0, t0 + Duration::from_millis(100));

        // First deadline was pushed out by the second notification.
        assert!(!c.tick(t0 + QUIET));
        assert!(c.tick(t0 + Duration::from_millis(100) + QUIET));
        assert_eq!(c.container_width(), 700.0);
        assert!(!c.tick(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn resize_back_to_previous_width_hits_the_pack_cache() {
        let widths = vec![300.0, 400.0, 200.0, 500.0, 600.0];
        let mut c = controller(widths.clone(), 1000.0);
        let reference = c.finished_rows().to_vec();

        let t0 = Instant::now();
        c.note_resize(600.0, t0);
        c.tick(t0 + QUIET);
        c.note_resize(1000.0, t0 + QUIET * 2);
        c.tick(t0 + QUIET * 3);

        assert_eq!(c.finished_rows(), reference.as_slice());
    }

    #[test]
    fn broken_image_is_excluded_permanently() {
        let mut c = controller(vec![300.0, 400.0, 200.0, 500.0, 600.0], 1000.0);
        c.image_broken(1);
        assert!(c.host().broken.contains(&1));

        // A full reset re-measures everything; the hidden image keeps
        // reporting zero width and never lands in a row.
        let t0 = Instant::now();
        c.note_resize(900.0, t0);
        c.tick(t0 + QUIET);

        let placed: Vec<usize> = c
            .finished_rows()
            .iter()
            .chain(c.trailing_row())
            .flat_map(|row| row.items.clone())
            .collect();
        assert!(!placed.contains(&1));
    }

    #[test]
    fn degraded_mode_ignores_image_ready() {
        let mut host = TestHost::new(vec![300.0, 400.0, 200.0, 500.0], 1000.0);
        host.capability = LoadCapability::None;
        let mut c = GalleryController::new(GalleryConfig::default(), host);
        c.init();

        // It still laid out once.
        assert_eq!(c.state(), GalleryState::LaidOut);
        assert!(!c.finished_rows().is_empty());

        let t0 = Instant::now();
        c.note_image_ready(t0);
        assert!(!c.tick(t0 + QUIET));
    }

    #[test]
    fn row_applied_callback_fires_per_finished_row() {
        let applied = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&applied);

        let host = TestHost::new(vec![300.0, 400.0, 200.0, 500.0, 600.0], 1000.0);
        let mut c = GalleryController::new(GalleryConfig::default(), host);
        c.on_row_applied(move |row| seen.borrow_mut().push(row.items.len()));
        c.init();

        assert_eq!(*applied.borrow(), vec![3, 1]);

        // Re-running finishes nothing new, so the callback stays quiet.
        c.run();
        assert_eq!(applied.borrow().len(), 2);
    }

    #[test]
    fn run_before_init_is_a_noop() {
        let host = TestHost::new(vec![300.0], 1000.0);
        let mut c = GalleryController::new(GalleryConfig::default(), host);
        c.run();
        assert_eq!(c.state(), GalleryState::Idle);
        assert_eq!(c.host().measures, 0);
    }

    #[test]
    fn empty_gallery_lays_out_to_nothing() {
        let c = controller(Vec::new(), 1000.0);
        assert_eq!(c.state(), GalleryState::LaidOut);
        assert!(c.finished_rows().is_empty());
        assert!(c.trailing_row().is_none());
    }
}
