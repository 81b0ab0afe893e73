//! Indicator engine.

use crate::models::Series;
use crate::surface::LinePoint;

/// Smallest and largest moving-average period the controls allow.
pub const MA_PERIOD_RANGE: std::ops::RangeInclusive<usize> = 1..=200;

/// Moving-average overlay settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingAverageConfig {
    pub enabled: bool,
    pub period: usize,
}

/// Visibility and parameters of the derived overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorConfig {
    pub moving_average: MovingAverageConfig,
    pub show_prediction: bool,
    pub show_volume: bool,
}

impl IndicatorConfig {
    /// All overlays on, with the given moving-average period.
    pub fn with_ma_period(period: usize) -> Self {
        Self {
            moving_average: MovingAverageConfig {
                enabled: true,
                period,
            },
            show_prediction: true,
            show_volume: true,
        }
    }
}

/// Trailing simple moving average of closes.
///
/// Emits one point per bar from index `period - 1` onward, stamped with that
/// bar's timestamp. No partial windows: a series shorter than `period` (or a
/// zero period) yields an empty result.
pub fn moving_average(series: &Series, period: usize) -> Vec<LinePoint> {
    let bars = series.bars();
    if period == 0 || bars.len() < period {
        return Vec::new();
    }

    bars.windows(period)
        .map(|window| {
            let sum: f64 = window.iter().map(|bar| bar.close).sum();
            LinePoint {
                time: window[period - 1].timestamp,
                value: sum / period as f64,
            }
        })
        .collect()
}
