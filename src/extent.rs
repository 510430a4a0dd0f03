//! Width×height value type and aspect-preserving scaling.
//!
//! All grid geometry runs on `f64` pixel measures; rounding to device
//! pixels is the renderer's concern, not ours.

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Extent {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Extent {
    /// Create a new extent.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Scale to the given width, deriving height from this extent's
    /// aspect ratio.
    pub fn scale_to_width(self, new_width: f64) -> Self {
        Self {
            width: new_width,
            height: new_width * self.height / self.width,
        }
    }

    /// Scale to the given height, deriving width from this extent's
    /// aspect ratio.
    pub fn scale_to_height(self, new_height: f64) -> Self {
        Self {
            width: self.width * new_height / self.height,
            height: new_height,
        }
    }

    /// Width-to-height ratio.
    pub fn aspect(self) -> f64 {
        self.width / self.height
    }

    /// Whether both components are finite and strictly positive.
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
