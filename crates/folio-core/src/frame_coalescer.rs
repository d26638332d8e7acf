#![forbid(unsafe_code)]

//! Frame coalescing for scroll and resize ticks.
//!
//! Browsers fire scroll events per pixel step. Resolving the active section on
//! every one of them is wasted work, so ticks are folded into at most one
//! resolution per rendering frame.
//!
//! # Design
//!
//! "Latest wins": a pending scroll keeps only the newest offset, a pending
//! resize keeps only the newest height. The tick count is kept so callers can
//! see how much motion a frame absorbed. Nothing is flushed automatically; the
//! frame driver calls [`FrameCoalescer::flush`] once per frame.
//!
//! # Usage
//!
//! ```
//! use folio_core::frame_coalescer::FrameCoalescer;
//!
//! let mut coalescer = FrameCoalescer::new();
//! coalescer.push_scroll(10.0);
//! coalescer.push_scroll(42.0);
//! coalescer.push_resize(900.0);
//!
//! let input = coalescer.flush().expect("pending input");
//! assert_eq!(input.scroll_y, Some(42.0));
//! assert_eq!(input.viewport_height, Some(900.0));
//! assert_eq!(input.scroll_ticks, 2);
//! assert!(coalescer.flush().is_none());
//! ```

/// Everything a frame needs to know about motion since the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Latest scroll offset, if the page scrolled.
    pub scroll_y: Option<f64>,
    /// Latest viewport height, if the viewport resized.
    pub viewport_height: Option<f64>,
    /// Number of raw scroll ticks folded into this frame.
    pub scroll_ticks: u32,
}

/// Coalesces high-frequency scroll/resize ticks to one per frame.
///
/// Not thread-safe; lives on the UI thread with the rest of the engine. All
/// operations are O(1).
#[derive(Debug, Clone, Default)]
pub struct FrameCoalescer {
    pending_scroll: Option<f64>,
    pending_height: Option<f64>,
    scroll_ticks: u32,
}

impl FrameCoalescer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scroll tick. Non-finite offsets are dropped.
    pub fn push_scroll(&mut self, scroll_y: f64) {
        if !scroll_y.is_finite() {
            return;
        }
        self.pending_scroll = Some(scroll_y);
        self.scroll_ticks = self.scroll_ticks.saturating_add(1);
    }

    /// Record a viewport resize. Non-finite or negative heights are dropped.
    pub fn push_resize(&mut self, height: f64) {
        if !height.is_finite() || height < 0.0 {
            return;
        }
        self.pending_height = Some(height);
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_scroll.is_some() || self.pending_height.is_some()
    }

    #[must_use]
    pub fn pending_scroll_ticks(&self) -> u32 {
        self.scroll_ticks
    }

    /// Take the coalesced input for this frame, leaving the coalescer empty.
    #[must_use]
    pub fn flush(&mut self) -> Option<FrameInput> {
        if !self.has_pending() {
            return None;
        }
        let input = FrameInput {
            scroll_y: self.pending_scroll.take(),
            viewport_height: self.pending_height.take(),
            scroll_ticks: self.scroll_ticks,
        };
        self.scroll_ticks = 0;
        Some(input)
    }

    /// Discard pending input without processing it.
    pub fn clear(&mut self) {
        self.pending_scroll = None;
        self.pending_height = None;
        self.scroll_ticks = 0;
    }
}
