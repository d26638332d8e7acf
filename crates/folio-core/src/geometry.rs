#![forbid(unsafe_code)]

//! Geometric primitives in document space.
//!
//! All values are CSS pixels measured from the document top. Only the vertical
//! axis matters to the engine; sections span the full content width.

/// Vertical extent of a section (or of the observation band).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Top edge (inclusive).
    pub top: f64,
    /// Height in pixels. Negative heights are treated as zero.
    pub height: f64,
}

impl Bounds {
    #[inline]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height.max(0.0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.height.is_nan() || self.height <= 0.0
    }

    /// Whether the two extents share any area.
    ///
    /// Touching edges do not count, and an empty extent intersects nothing.
    #[inline]
    pub fn intersects(&self, other: &Bounds) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.top < other.bottom() && other.top < self.bottom()
    }
}

/// Fractional insets that shrink the viewport into the observation band.
///
/// Mirrors a `rootMargin` of `-top% 0px -bottom% 0px`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BandInsets {
    /// Fraction of the viewport height cut from the top.
    pub top: f64,
    /// Fraction of the viewport height cut from the bottom.
    pub bottom: f64,
}

impl BandInsets {
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Whether both insets are in `[0, 1)` and leave a non-empty band.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (0.0..1.0).contains(&self.top)
            && (0.0..1.0).contains(&self.bottom)
            && self.top + self.bottom < 1.0
    }
}

impl Default for BandInsets {
    /// 20% off the top, 60% off the bottom: the upper-middle of the screen.
    fn default() -> Self {
        Self::new(0.20, 0.60)
    }
}

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Vertical scroll position (document offset of the viewport top).
    pub scroll_y: f64,
    /// Viewport height.
    pub height: f64,
}

impl Viewport {
    pub const fn new(scroll_y: f64, height: f64) -> Self {
        Self { scroll_y, height }
    }

    /// The viewport as document-space bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.scroll_y, self.height)
    }

    /// The observation band in document space.
    #[must_use]
    pub fn band(&self, insets: BandInsets) -> Bounds {
        let height = self.height.max(0.0);
        let top = self.scroll_y + height * insets.top;
        let band_height = height * (1.0 - insets.top - insets.bottom);
        Bounds::new(top, band_height.max(0.0))
    }
}
