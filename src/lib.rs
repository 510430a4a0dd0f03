//! Justified photo-grid layout computation.
//!
//! Given a sequence of images with intrinsic dimensions and a band of
//! acceptable row heights, partitions the images into rows and assigns each
//! image an exact on-screen size so that every row fills the container
//! width exactly. Pure geometry — no pixel operations, no I/O, `no_std`
//! compatible (row building requires `alloc`).
//!
//! # Modules
//!
//! - [`extent`] — width×height value type and aspect-preserving scaling
//! - [`row`] — height-bounded greedy row packing and exact width justification
//! - [`grid`] — normalization, orchestration, width-keyed caching, best-file
//!   selection
//!
//! # Example
//!
//! ```
//! use zengrid::{Extent, Grid, GridSettings, ImageSource};
//!
//! #[derive(Clone)]
//! struct Photo {
//!     width: f64,
//!     height: f64,
//! }
//!
//! impl ImageSource for Photo {
//!     fn extent(&self) -> Extent {
//!         Extent::new(self.width, self.height)
//!     }
//! }
//!
//! let photos = vec![
//!     Photo { width: 800.0, height: 600.0 },
//!     Photo { width: 600.0, height: 600.0 },
//!     Photo { width: 1000.0, height: 500.0 },
//! ];
//!
//! let settings = GridSettings::new(1200.0).min_height(100.0).max_height(300.0);
//! let mut grid = Grid::new(settings, &photos).unwrap();
//! let rows = grid.rows(1200.0).unwrap();
//!
//! // Every row's images sum to the container width exactly.
//! let total: f64 = rows[0].items().iter().map(|i| i.resized.width).sum();
//! assert!((total - 1200.0).abs() < 1e-6);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod extent;
#[cfg(feature = "alloc")]
pub mod grid;
#[cfg(feature = "alloc")]
pub mod row;

pub use extent::Extent;
#[cfg(feature = "alloc")]
pub use grid::{Grid, GridError, GridSettings, ImageSource};
#[cfg(feature = "alloc")]
pub use row::{NormalizedImage, ResizedImage, Row};
