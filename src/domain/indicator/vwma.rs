//! Volume-Weighted Moving Average.
//!
//! VWMA(n) = sum(C[i] * V[i]) / sum(V[i]) over the last n bars.
//! Warmup: the first (n-1) bars return NaN.
//!
//! Running sums are kept over a bounded ring so each update is O(1). The ring
//! grows with the bars it receives, up to the window size.
//! The sums are compensated (Neumaier) so that evicting a large entry does
//! not wipe out the small ones still in the window.

use tracing::{debug, trace, warn};

use crate::domain::bar::Bar;
use crate::domain::error::BarstatError;
use crate::domain::indicator::Indicator;

/// Bounded FIFO of `(close * volume, volume)` pairs.
///
/// Slots are allocated on push, so `capacity` costs nothing up front.
#[derive(Debug, Clone)]
struct RingWindow {
    slots: Vec<(f64, f64)>,
    capacity: usize,
    // oldest slot once full
    cursor: usize,
}

impl RingWindow {
    fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
            cursor: 0,
        }
    }

    /// Push a new entry, returning the entry it displaced once full.
    fn push(&mut self, entry: (f64, f64)) -> Option<(f64, f64)> {
        if self.slots.len() < self.capacity {
            self.slots.push(entry);
            return None;
        }
        let evicted = std::mem::replace(&mut self.slots[self.cursor], entry);
        self.cursor = (self.cursor + 1) % self.capacity;
        Some(evicted)
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.cursor = 0;
    }
}

/// Neumaier-compensated running sum.
#[derive(Debug, Clone, Copy, Default)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

#[derive(Debug, Clone)]
pub struct VolumeWeightedMovingAverage {
    window: usize,
    ring: RingWindow,
    sum_price_volume: CompensatedSum,
    sum_volume: CompensatedSum,
    // exact zero-volume detection, independent of float residue
    nonzero_volumes: usize,
    seen: usize,
    zero_volume_run: bool,
}

impl VolumeWeightedMovingAverage {
    pub fn new(window: usize) -> Result<Self, BarstatError> {
        if window == 0 {
            return Err(BarstatError::validation("window must be > 0"));
        }
        Ok(Self {
            window,
            ring: RingWindow::new(window),
            sum_price_volume: CompensatedSum::default(),
            sum_volume: CompensatedSum::default(),
            nonzero_volumes: 0,
            seen: 0,
            zero_volume_run: false,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn reset(&mut self) {
        self.ring.clear();
        self.sum_price_volume = CompensatedSum::default();
        self.sum_volume = CompensatedSum::default();
        self.nonzero_volumes = 0;
        self.seen = 0;
        self.zero_volume_run = false;
    }

    /// True once `window` bars have been seen.
    pub fn is_ready(&self) -> bool {
        self.seen >= self.window
    }

    /// Push `bar` into the window.
    ///
    /// Returns NaN until the window is full, and 0 when every volume in a
    /// full window is zero.
    pub fn update(&mut self, bar: &Bar) -> f64 {
        let price_volume = bar.turnover();
        let volume = bar.volume;

        self.sum_price_volume.add(price_volume);
        self.sum_volume.add(volume);
        if volume != 0.0 {
            self.nonzero_volumes += 1;
        }
        self.seen = self.seen.saturating_add(1);

        if let Some((old_price_volume, old_volume)) = self.ring.push((price_volume, volume)) {
            self.sum_price_volume.add(-old_price_volume);
            self.sum_volume.add(-old_volume);
            if old_volume != 0.0 {
                self.nonzero_volumes -= 1;
            }
        }

        if !self.is_ready() {
            return f64::NAN;
        }

        if self.nonzero_volumes == 0 {
            if !self.zero_volume_run {
                warn!(date = %bar.date, window = self.window, "vwma window has zero volume");
                self.zero_volume_run = true;
            }
            return 0.0;
        }
        self.zero_volume_run = false;

        let vwma = self.sum_price_volume.value() / self.sum_volume.value();
        trace!(date = %bar.date, vwma, "vwma update");
        vwma
    }

    /// Feed every bar through a fresh instance.
    ///
    /// The first `window - 1` positions hold the NaN warmup sentinel.
    pub fn compute(bars: &[Bar], window: usize) -> Result<Vec<f64>, BarstatError> {
        if window == 0 || bars.len() < window {
            return Err(BarstatError::validation(format!(
                "window must be > 0 and <= number of bars (window {window}, bars {})",
                bars.len()
            )));
        }
        debug!(bars = bars.len(), window, "computing vwma");

        let mut vwma = Self::new(window)?;
        Ok(bars.iter().map(|bar| vwma.update(bar)).collect())
    }
}

impl Indicator for VolumeWeightedMovingAverage {
    fn update(&mut self, bar: &Bar) -> Result<f64, BarstatError> {
        Ok(VolumeWeightedMovingAverage::update(self, bar))
    }

    fn reset(&mut self) {
        VolumeWeightedMovingAverage::reset(self)
    }
}
