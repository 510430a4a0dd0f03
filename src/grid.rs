//! Grid orchestration: normalization, row construction, width-keyed
//! caching, and best-file selection.
//!
//! [`Grid`] owns the full image collection. Each layout pass clones the
//! pristine normalized set into a working pool and packs rows until the
//! pool is exhausted; the finished row set is memoized against the
//! requested width and rebuilt whenever a different width is asked for.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::extent::Extent;
use crate::row::{NormalizedImage, Row, RowSettings};

/// Caller-supplied image collaborator.
///
/// The grid reads intrinsic dimensions through this seam instead of
/// prescribing an image record shape. Implementations must be pure: the
/// same image always reports the same dimensions.
pub trait ImageSource {
    /// Intrinsic width and height of the image.
    fn extent(&self) -> Extent;

    /// Pre-rendered file variants available for this image, used to pick
    /// the smallest file wide enough for the final rendered size.
    ///
    /// Return `None` (the default) to skip file selection entirely.
    /// Returning `Some` with an empty list is a contract violation and
    /// fails the layout pass with [`GridError::NoFileVariants`].
    fn files(&self) -> Option<Vec<Extent>> {
        None
    }
}

/// Layout settings with named defaults.
///
/// `target_height` — the height a row aims for before packing pressure
/// compresses it — is always the midpoint of `min_height` and
/// `max_height`; it is derived, never configurable.
///
/// # Example
///
/// ```
/// use zengrid::GridSettings;
///
/// let settings = GridSettings::new(1200.0)
///     .min_height(150.0)
///     .max_height(350.0)
///     .border_width(2.0);
/// assert_eq!(settings.target_height(), 250.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridSettings {
    /// Width of the container the rows must fill, in pixels. Can be
    /// overridden per [`Grid::rows`] call.
    pub container_width: f64,
    /// Minimum acceptable row height. Images that normalize below it are
    /// dropped from the layout. Default 100.
    pub min_height: f64,
    /// Maximum acceptable row height. Default unbounded.
    pub max_height: f64,
    /// Border added around each image, counted against the container
    /// width once per image. Default 0.
    pub border_width: f64,
}

impl GridSettings {
    /// Settings for the given container width, with defaults for the rest.
    pub const fn new(container_width: f64) -> Self {
        Self {
            container_width,
            min_height: 100.0,
            max_height: f64::INFINITY,
            border_width: 0.0,
        }
    }

    /// Set the minimum row height.
    pub const fn min_height(mut self, min_height: f64) -> Self {
        self.min_height = min_height;
        self
    }

    /// Set the maximum row height.
    pub const fn max_height(mut self, max_height: f64) -> Self {
        self.max_height = max_height;
        self
    }

    /// Set the per-image border width.
    pub const fn border_width(mut self, border_width: f64) -> Self {
        self.border_width = border_width;
        self
    }

    /// The ideal row height: the midpoint of the min/max band, or 200
    /// when `max_height` is unbounded and no midpoint exists.
    pub fn target_height(&self) -> f64 {
        let midpoint = (self.min_height + self.max_height) / 2.0;
        if midpoint.is_finite() { midpoint } else { 200.0 }
    }

    fn validate(&self) -> Result<(), GridError> {
        let widths_ok = self.container_width.is_finite()
            && self.container_width >= 0.0
            && self.border_width.is_finite()
            && self.border_width >= 0.0;
        let heights_ok = self.min_height.is_finite()
            && self.min_height > 0.0
            && self.max_height >= self.min_height;
        if widths_ok && heights_ok {
            Ok(())
        } else {
            Err(GridError::InvalidSettings)
        }
    }
}

/// Grid layout error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// An input image has zero, negative, or non-finite intrinsic
    /// dimensions.
    ZeroSourceDimension,
    /// Settings are unusable: negative or non-finite widths, non-positive
    /// `min_height`, `max_height` below `min_height`, or no positive
    /// container width available for a layout pass.
    InvalidSettings,
    /// [`ImageSource::files`] opted into file selection but returned an
    /// empty list.
    NoFileVariants,
}

/// The most recent layout pass, keyed by the width it was requested with.
///
/// A single-slot memo: a repeat request at the same width returns these
/// rows untouched; any other width rebuilds from the pristine normalized
/// set.
#[derive(Clone, Debug)]
struct LayoutCache<T> {
    width: f64,
    rows: Vec<Row<T>>,
}

/// Justified photo-grid layout over a fixed image collection.
///
/// Construction normalizes every image once; [`rows`](Self::rows) packs
/// them into justified rows for a given container width. See the crate
/// docs for a complete example.
#[derive(Clone, Debug)]
pub struct Grid<T: ImageSource + Clone> {
    settings: GridSettings,
    /// Effective container width of the last layout pass; updated only by
    /// calls that supply a positive width.
    container_width: f64,
    /// Pristine normalized set; never mutated after construction.
    normalized: Vec<NormalizedImage<T>>,
    cache: Option<LayoutCache<T>>,
}

impl<T: ImageSource + Clone> Grid<T> {
    /// Create a grid, normalizing each image to the target row height
    /// (aspect-preserved, capped at the image's own height so sources are
    /// never upscaled during normalization).
    pub fn new(settings: GridSettings, images: &[T]) -> Result<Self, GridError> {
        settings.validate()?;
        let target_height = settings.target_height();
        let normalized = images
            .iter()
            .map(|image| {
                let extent = image.extent();
                if !extent.is_valid() {
                    return Err(GridError::ZeroSourceDimension);
                }
                Ok(NormalizedImage {
                    image: image.clone(),
                    extent,
                    target_size: extent.scale_to_height(target_height.min(extent.height)),
                })
            })
            .collect::<Result<Vec<_>, GridError>>()?;
        Ok(Self {
            container_width: settings.container_width,
            settings,
            normalized,
            cache: None,
        })
    }

    /// The settings this grid was built with.
    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Compute (or return the memoized) justified rows for `width`.
    ///
    /// A repeat call with the width of the previous call returns the
    /// cached rows without recomputation. Any other width rebuilds the
    /// full layout from the pristine normalized set. A zero or non-finite
    /// `width` keeps the previously resolved container width, so the
    /// first call may pass 0 to use `settings.container_width`.
    pub fn rows(&mut self, width: f64) -> Result<&[Row<T>], GridError> {
        let cached = self
            .cache
            .as_ref()
            .is_some_and(|cache| cache.width.to_bits() == width.to_bits());
        if !cached {
            let rows = self.build_rows(width)?;
            self.cache = Some(LayoutCache { width, rows });
        }
        Ok(self.cache.as_ref().map_or(&[], |cache| cache.rows.as_slice()))
    }

    /// One full layout pass: resolve the container width, pack rows until
    /// the pool is empty, then run best-file selection.
    fn build_rows(&mut self, width: f64) -> Result<Vec<Row<T>>, GridError> {
        if width.is_finite() && width > 0.0 {
            self.container_width = width;
        }
        if !self.container_width.is_finite() || self.container_width <= 0.0 {
            return Err(GridError::InvalidSettings);
        }

        let row_settings = RowSettings {
            container_width: self.container_width,
            border_width: self.settings.border_width,
            min_height: self.settings.min_height,
            max_height: self.settings.max_height,
            target_height: self.settings.target_height(),
        };

        // Working pool for this pass; the pristine set stays untouched.
        let mut pool: VecDeque<NormalizedImage<T>> = self.normalized.iter().cloned().collect();
        let mut rows = Vec::new();
        while !pool.is_empty() {
            rows.push(Row::pack(&row_settings, &mut pool));
        }

        select_best_files(&mut rows)?;
        Ok(rows)
    }
}

/// Attach to each finalized item the smallest available file variant whose
/// width covers the justified width, falling back to the widest variant
/// when none does. Items whose source does not expose files are skipped.
fn select_best_files<T: ImageSource + Clone>(rows: &mut [Row<T>]) -> Result<(), GridError> {
    for row in rows {
        for item in row.items_mut() {
            let Some(files) = item.image.files() else {
                continue;
            };
            if files.is_empty() {
                return Err(GridError::NoFileVariants);
            }

            let wanted = item.resized.width;
            let mut best_fit: Option<Extent> = None;
            let mut widest: Option<Extent> = None;
            for file in files.iter().copied() {
                if widest.is_none_or(|w| file.width > w.width) {
                    widest = Some(file);
                }
                if file.width >= wanted && best_fit.is_none_or(|b| file.width < b.width) {
                    best_fit = Some(file);
                }
            }
            item.best_file = best_fit.or(widest);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[derive(Clone, Debug, PartialEq)]
    struct Photo {
        extent: Extent,
        files: Option<Vec<Extent>>,
    }

    impl Photo {
        fn new(width: f64, height: f64) -> Self {
            Self {
                extent: Extent::new(width, height),
                files: None,
            }
        }

        fn with_files(width: f64, height: f64, files: Vec<Extent>) -> Self {
            Self {
                extent: Extent::new(width, height),
                files: Some(files),
            }
        }
    }

    impl ImageSource for Photo {
        fn extent(&self) -> Extent {
            self.extent
        }

        fn files(&self) -> Option<Vec<Extent>> {
            self.files.clone()
        }
    }

    fn band(container: f64) -> GridSettings {
        GridSettings::new(container).min_height(100.0).max_height(300.0)
    }

    // ── settings ────────────────────────────────────────────────────────

    #[test]
    fn defaults() {
        let s = GridSettings::new(1000.0);
        assert_eq!(s.min_height, 100.0);
        assert_eq!(s.max_height, f64::INFINITY);
        assert_eq!(s.border_width, 0.0);
    }

    #[test]
    fn target_height_is_band_midpoint() {
        assert_eq!(band(1000.0).target_height(), 200.0);
        assert_eq!(
            GridSettings::new(1000.0)
                .min_height(150.0)
                .max_height(350.0)
                .target_height(),
            250.0
        );
    }

    #[test]
    fn target_height_falls_back_when_unbounded() {
        assert_eq!(GridSettings::new(1000.0).target_height(), 200.0);
        assert_eq!(
            GridSettings::new(1000.0).min_height(50.0).target_height(),
            200.0
        );
    }

    #[test]
    fn invalid_settings_rejected() {
        let images = [Photo::new(800.0, 600.0)];
        let inverted = GridSettings::new(1000.0).min_height(300.0).max_height(100.0);
        assert_eq!(
            Grid::new(inverted, &images).err(),
            Some(GridError::InvalidSettings)
        );
        let zero_min = GridSettings::new(1000.0).min_height(0.0);
        assert_eq!(
            Grid::new(zero_min, &images).err(),
            Some(GridError::InvalidSettings)
        );
    }

    // ── normalization ───────────────────────────────────────────────────

    #[test]
    fn zero_dimension_image_fails_fast() {
        let images = [Photo::new(0.0, 600.0)];
        assert_eq!(
            Grid::new(band(1000.0), &images).err(),
            Some(GridError::ZeroSourceDimension)
        );
    }

    #[test]
    fn normalization_never_upscales_past_source_height() {
        // Intrinsic height 150 < target 200: target size stays 150 tall.
        let images = [Photo::new(600.0, 150.0)];
        let mut grid = Grid::new(band(1000.0), &images).unwrap();
        let rows = grid.rows(1000.0).unwrap();
        let item = &rows[0].items()[0];
        assert!((item.target_size.height - 150.0).abs() < EPS);
        assert!((item.target_size.width - 600.0).abs() < EPS);
    }

    // ── container width resolution ──────────────────────────────────────

    #[test]
    fn zero_width_uses_settings_width() {
        let images = [Photo::new(800.0, 600.0), Photo::new(600.0, 600.0)];
        let mut grid = Grid::new(band(800.0), &images).unwrap();
        let rows = grid.rows(0.0).unwrap();
        let total: f64 = rows[0].items().iter().map(|i| i.resized.width).sum();
        assert!((total - 800.0).abs() < EPS);
    }

    #[test]
    fn explicit_width_overrides_settings_width() {
        let images = [
            Photo::new(800.0, 600.0),
            Photo::new(600.0, 600.0),
            Photo::new(1000.0, 500.0),
        ];
        let mut grid = Grid::new(band(800.0), &images).unwrap();
        grid.rows(0.0).unwrap();
        let rows = grid.rows(1000.0).unwrap();
        let total: f64 = rows[0].items().iter().map(|i| i.resized.width).sum();
        assert!((total - 1000.0).abs() < EPS);
    }

    #[test]
    fn no_usable_width_is_an_error() {
        let images = [Photo::new(800.0, 600.0)];
        let mut grid = Grid::new(band(0.0), &images).unwrap();
        assert_eq!(grid.rows(0.0).err(), Some(GridError::InvalidSettings));
    }

    // ── best-file selection ─────────────────────────────────────────────

    #[test]
    fn best_file_is_smallest_wide_enough() {
        // Single image justified to width 1200.
        let files = vec![
            Extent::new(640.0, 480.0),
            Extent::new(1280.0, 960.0),
            Extent::new(2560.0, 1920.0),
        ];
        let images = [Photo::with_files(800.0, 600.0, files)];
        // Wide container forces the underfill branch; resized width is
        // the packed 266.67, so 640 wins.
        let mut grid = Grid::new(band(1200.0), &images).unwrap();
        let rows = grid.rows(1200.0).unwrap();
        let best = rows[0].items()[0].best_file.unwrap();
        assert_eq!(best.width, 640.0);
    }

    #[test]
    fn best_file_falls_back_to_widest() {
        let files = vec![Extent::new(100.0, 75.0), Extent::new(200.0, 150.0)];
        let images = [
            Photo::with_files(800.0, 600.0, files),
            Photo::new(600.0, 600.0),
            Photo::new(1000.0, 500.0),
        ];
        let mut grid = Grid::new(band(1200.0), &images).unwrap();
        let rows = grid.rows(1200.0).unwrap();
        let item = &rows[0].items()[0];
        // Justified width ~369 exceeds every variant: widest wins.
        assert!(item.resized.width > 200.0);
        assert_eq!(item.best_file.unwrap().width, 200.0);
        // Sources without files are skipped.
        assert!(rows[0].items()[1].best_file.is_none());
    }

    #[test]
    fn empty_file_list_fails_fast() {
        let images = [Photo::with_files(800.0, 600.0, Vec::new())];
        let mut grid = Grid::new(band(1200.0), &images).unwrap();
        assert_eq!(grid.rows(1200.0).err(), Some(GridError::NoFileVariants));
    }
}
