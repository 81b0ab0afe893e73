//! OHLCV bars, prediction points and the validated [`Series`].

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{DashError, Result};

/// A single OHLCV sample for one sampling interval.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bar {
    /// Start of the sampling interval (UTC).
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

impl Bar {
    /// Returns `true` if the bar closed strictly above its open.
    pub fn is_up(&self) -> bool {
        self.close > self.open
    }

    /// Checks the OHLC envelope: positive prices and `low <= open, close <= high`.
    fn check_shape(&self) -> std::result::Result<(), &'static str> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err("prices must be positive and finite");
        }
        if self.low > self.open.min(self.close) {
            return Err("low above min(open, close)");
        }
        if self.high < self.open.max(self.close) {
            return Err("high below max(open, close)");
        }
        Ok(())
    }
}

/// A forecast price for a future timestamp.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionPoint {
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Chronologically ordered bars with strictly increasing timestamps.
///
/// The only way to build a non-empty `Series` is [`Series::new`], so every
/// instance upholds the ordering the moving average and the "previous bar"
/// change calculation rely on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// Validates and wraps `bars`.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::DataIntegrity`] if timestamps are not strictly
    /// increasing or a bar violates the OHLC envelope.
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        for (i, bar) in bars.iter().enumerate() {
            bar.check_shape().map_err(|reason| {
                DashError::DataIntegrity(format!("bar {i} at {}: {reason}", bar.timestamp))
            })?;
        }
        if let Some(i) = bars
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(DashError::DataIntegrity(format!(
                "bar timestamps not strictly increasing at index {}: {} after {}",
                i + 1,
                bars[i + 1].timestamp,
                bars[i].timestamp
            )));
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Returns the last two bars as `(previous, latest)`.
    pub fn last_pair(&self) -> Option<(&Bar, &Bar)> {
        match self.bars.as_slice() {
            [.., prev, last] => Some((prev, last)),
            _ => None,
        }
    }
}

/// Checks that predictions are strictly increasing and strictly after the
/// last bar.
///
/// # Errors
///
/// Returns [`DashError::DataIntegrity`] on overlapping, preceding or
/// unordered predictions, or a non-positive price.
pub fn validate_predictions(series: &Series, predictions: &[PredictionPoint]) -> Result<()> {
    if let Some(p) = predictions
        .iter()
        .find(|p| !p.price.is_finite() || p.price <= 0.0)
    {
        return Err(DashError::DataIntegrity(format!(
            "prediction at {} has non-positive price {}",
            p.timestamp, p.price
        )));
    }
    if let (Some(last), Some(first)) = (series.last(), predictions.first())
        && first.timestamp <= last.timestamp
    {
        return Err(DashError::DataIntegrity(format!(
            "prediction at {} does not follow last bar at {}",
            first.timestamp, last.timestamp
        )));
    }
    if let Some(pair) = predictions
        .windows(2)
        .find(|pair| pair[1].timestamp <= pair[0].timestamp)
    {
        return Err(DashError::DataIntegrity(format!(
            "prediction timestamps not strictly increasing: {} after {}",
            pair[1].timestamp, pair[0].timestamp
        )));
    }
    Ok(())
}
