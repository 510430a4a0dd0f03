//! Height-bounded greedy row packing and exact width justification.
//!
//! A [`Row`] consumes images from the front of a shared pool until the
//! container width is spent, then stretches or shrinks its members so the
//! row fills the container exactly. Acceptance is a heuristic, not exact
//! bin-packing: a marginally-overflowing candidate is admitted while the
//! row still has height slack, which produces tighter rows than a naive
//! "reject any overflow" rule.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::extent::Extent;

/// An image scaled (aspect-preserved) to the grid's target row height.
///
/// `target_size.height` is capped at the intrinsic height — images are
/// never upscaled past their source size during normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedImage<T> {
    /// The caller's image record.
    pub image: T,
    /// Intrinsic dimensions.
    pub extent: Extent,
    /// Dimensions at the current working row height.
    pub target_size: Extent,
}

/// A row member with its final justified size assigned.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizedImage<T> {
    /// The caller's image record.
    pub image: T,
    /// Intrinsic dimensions.
    pub extent: Extent,
    /// Dimensions at the height the row settled on during packing.
    pub target_size: Extent,
    /// Final justified dimensions.
    pub resized: Extent,
    /// Smallest pre-rendered variant wide enough for `resized`, when the
    /// source opted into file selection. See [`ImageSource::files`].
    ///
    /// [`ImageSource::files`]: crate::grid::ImageSource::files
    pub best_file: Option<Extent>,
}

/// Layout parameters a row copies at creation time.
#[derive(Copy, Clone, Debug)]
pub(crate) struct RowSettings {
    pub container_width: f64,
    pub border_width: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub target_height: f64,
}

/// One packed row of a justified grid.
///
/// All members of an open row share a single working height; accepting a
/// shorter image compresses the whole row to that image's height, so the
/// working height only ever decreases while the row fills.
#[derive(Clone, Debug, PartialEq)]
pub struct Row<T> {
    container_width: f64,
    border_width: f64,
    min_height: f64,
    max_height: f64,
    target_height: f64,
    cumulated_width: f64,
    current_height: f64,
    items: Vec<ResizedImage<T>>,
}

impl<T> Row<T> {
    /// Build one row from the front of `pool`, removing consumed (and
    /// permanently ineligible) images, and justify it to the container
    /// width. An empty pool yields an empty, already-justified row.
    pub(crate) fn pack(settings: &RowSettings, pool: &mut VecDeque<NormalizedImage<T>>) -> Self {
        let mut row = Self {
            container_width: settings.container_width,
            border_width: settings.border_width,
            min_height: settings.min_height,
            max_height: settings.max_height,
            target_height: settings.target_height,
            cumulated_width: 0.0,
            current_height: settings.target_height,
            items: Vec::new(),
        };

        loop {
            let Some(candidate) = pool.front() else { break };

            // Row is full; the candidate stays for the next row.
            if row.cumulated_width >= row.container_width {
                break;
            }

            // Can never satisfy the minimum height at any width — drop it.
            if candidate.target_size.height < row.min_height {
                pool.pop_front();
                continue;
            }

            if !row.admit(candidate) {
                break;
            }
            if let Some(accepted) = pool.pop_front() {
                row.commit(accepted);
            }
        }

        row.justify();
        row
    }

    /// Whether `candidate` may join this row. Pure: row state is only
    /// mutated once acceptance is decided, in [`commit`](Self::commit).
    fn admit(&self, candidate: &NormalizedImage<T>) -> bool {
        // A row must take at least one image, and a row already compressed
        // below the target height keeps absorbing rather than starting a
        // new (likely worse) row.
        if self.items.is_empty() || self.current_height < self.target_height {
            return true;
        }

        let image_height = candidate.target_size.height;
        let image_width = candidate.target_size.width + self.border_width;

        // A shorter candidate would compress the whole row to its height;
        // evaluate the fit at that trial height.
        let trial_height = image_height.min(self.current_height);
        let trial_cumulated = if trial_height < self.current_height {
            self.width_at_height(trial_height)
        } else {
            self.cumulated_width
        };

        if trial_cumulated + image_width <= self.container_width {
            return true;
        }

        // Soft acceptance: weigh remaining shrink headroom against how far
        // the candidate overflows the space left at the trial height.
        let min_delta = trial_height - self.min_height;
        if min_delta <= 0.0 {
            // Already at the minimum height: no shrink room, reject.
            return false;
        }
        let max_delta = self.max_height - trial_height;
        let acceptance_ratio = (max_delta / min_delta).min(1.0);

        let remaining_width = self.container_width - trial_cumulated;
        let surplus_delta = image_width - remaining_width;
        let surplus_ratio = (surplus_delta / remaining_width).min(1.0);

        // The ratios are measured at the trial height, but the weighted
        // candidate must fit the remainder of the uncompressed row.
        image_width * acceptance_ratio * surplus_ratio <= self.container_width - self.cumulated_width
    }

    /// Cumulated width (borders included) if every member were rescaled to
    /// `height`. Does not touch row state.
    fn width_at_height(&self, height: f64) -> f64 {
        self.items
            .iter()
            .map(|item| {
                item.extent.scale_to_height(height.min(item.extent.height)).width
                    + self.border_width
            })
            .sum()
    }

    /// Add an accepted candidate and recompute the shared row height as the
    /// minimum member height.
    fn commit(&mut self, candidate: NormalizedImage<T>) {
        self.items.push(ResizedImage {
            image: candidate.image,
            extent: candidate.extent,
            resized: candidate.target_size,
            target_size: candidate.target_size,
            best_file: None,
        });
        let height = self
            .items
            .iter()
            .map(|item| item.target_size.height)
            .fold(f64::INFINITY, f64::min);
        self.recompute(height);
    }

    /// Rescale every member to `height` and re-derive the cumulated width.
    fn recompute(&mut self, height: f64) {
        for item in &mut self.items {
            item.target_size = item.extent.scale_to_height(height.min(item.extent.height));
        }
        self.current_height = height;
        self.cumulated_width = self
            .items
            .iter()
            .map(|item| item.target_size.width + self.border_width)
            .sum();
    }

    /// Assign exact justified sizes: redistribute the border-free width
    /// budget proportionally so the row totals the container width.
    ///
    /// A row so under-filled that the correction would more than double the
    /// image widths keeps its packed sizes instead (typically the sparse
    /// final row); stretching it would look grotesque.
    fn justify(&mut self) {
        let cumulated_border = self.items.len() as f64 * self.border_width;
        let images_total_width = self.container_width - cumulated_border;
        let images_cumulated_width = self.cumulated_width - cumulated_border;
        let width_delta = images_total_width - images_cumulated_width;

        let keep_packed_sizes = width_delta >= images_cumulated_width;

        for item in &mut self.items {
            if keep_packed_sizes {
                item.resized = item.target_size;
            } else {
                let new_width =
                    item.target_size.width / images_cumulated_width * images_total_width;
                item.resized = item.extent.scale_to_width(new_width);
            }
        }
    }

    /// Re-justify this row against a new container width without repacking
    /// membership. Cheap width-only correction; a full relayout goes
    /// through [`Grid::rows`](crate::grid::Grid::rows) instead.
    pub fn change_container_width(&mut self, new_width: f64) {
        self.container_width = new_width;
        self.justify();
    }

    /// The row's members, in input order, with final sizes assigned.
    pub fn items(&self) -> &[ResizedImage<T>] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut [ResizedImage<T>] {
        &mut self.items
    }

    /// The shared working height the packer settled on. Justification
    /// scales members uniformly, so final heights are this times the
    /// row's justification factor.
    pub fn height(&self) -> f64 {
        self.current_height
    }

    /// Container width this row was last justified against.
    pub fn container_width(&self) -> f64 {
        self.container_width
    }
}
