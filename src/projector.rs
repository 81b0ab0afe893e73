//! Series projector: turns a dataset into per-overlay point sets.
//!
//! Everything here is a pure function of its inputs. [`Projection::apply`]
//! pushes a fully computed projection to a [`RenderSurface`], so callers never
//! expose a half-updated chart.

use crate::indicator::{IndicatorConfig, moving_average};
use crate::models::{Bar, PredictionPoint, Series};
use crate::store::Dataset;
use crate::surface::{
    Channel, LineChannel, LinePoint, OhlcPoint, PriceData, RenderMode, RenderSurface,
    VolumePoint, VolumeTone,
};

impl From<&Bar> for OhlcPoint {
    fn from(bar: &Bar) -> Self {
        OhlcPoint {
            time: bar.timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
        }
    }
}

/// Price overlay for `mode`: OHLC for candles and bars, closes for lines.
pub fn project_price(series: &Series, mode: RenderMode) -> PriceData {
    match mode {
        RenderMode::Candle | RenderMode::Bar => {
            PriceData::Ohlc(series.bars().iter().map(OhlcPoint::from).collect())
        }
        RenderMode::Line => PriceData::Close(
            series
                .bars()
                .iter()
                .map(|bar| LinePoint {
                    time: bar.timestamp,
                    value: bar.close,
                })
                .collect(),
        ),
    }
}

/// Volume columns; a bar is `Up` only if it closed strictly above its open.
pub fn project_volume(series: &Series) -> Vec<VolumePoint> {
    series
        .bars()
        .iter()
        .map(|bar| VolumePoint {
            time: bar.timestamp,
            volume: bar.volume,
            tone: if bar.is_up() {
                VolumeTone::Up
            } else {
                VolumeTone::Down
            },
        })
        .collect()
}

/// Prediction line, anchored on the last actual close.
///
/// Returns nothing when there are no predictions, so the overlay never shows
/// a lone anchor point.
pub fn project_prediction(series: &Series, predictions: &[PredictionPoint]) -> Vec<LinePoint> {
    if predictions.is_empty() {
        return Vec::new();
    }

    let anchor = series.last().map(|bar| LinePoint {
        time: bar.timestamp,
        value: bar.close,
    });

    anchor
        .into_iter()
        .chain(predictions.iter().map(|p| LinePoint {
            time: p.timestamp,
            value: p.price,
        }))
        .collect()
}

/// Every overlay derived from one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub mode: RenderMode,
    pub price: PriceData,
    pub volume: Vec<VolumePoint>,
    /// `None` when the moving average is disabled; the surface keeps its
    /// previous line hidden in that case.
    pub moving_average: Option<Vec<LinePoint>>,
    pub prediction: Vec<LinePoint>,
    pub indicators: IndicatorConfig,
}

impl Projection {
    pub fn new(dataset: &Dataset, mode: RenderMode, indicators: &IndicatorConfig) -> Self {
        let ma = &indicators.moving_average;
        Self {
            mode,
            price: project_price(&dataset.series, mode),
            volume: project_volume(&dataset.series),
            moving_average: ma
                .enabled
                .then(|| moving_average(&dataset.series, ma.period)),
            prediction: project_prediction(&dataset.series, &dataset.predictions),
            indicators: *indicators,
        }
    }

    /// Pushes every overlay and its visibility to `surface`.
    pub fn apply<S: RenderSurface + ?Sized>(self, surface: &mut S) {
        surface.set_price_data(self.mode, self.price);
        surface.set_volume_data(self.volume);
        surface.set_line_data(LineChannel::Prediction, self.prediction);
        let ma_visible = match self.moving_average {
            Some(points) => {
                surface.set_line_data(LineChannel::MovingAverage, points);
                true
            }
            None => false,
        };
        apply_visibility(surface, &self.indicators, ma_visible);
    }
}

/// Applies overlay visibility without touching any data.
pub fn apply_visibility<S: RenderSurface + ?Sized>(
    surface: &mut S,
    indicators: &IndicatorConfig,
    ma_visible: bool,
) {
    surface.set_visible(Channel::Price, true);
    surface.set_visible(Channel::Volume, indicators.show_volume);
    surface.set_visible(Channel::Line(LineChannel::MovingAverage), ma_visible);
    surface.set_visible(
        Channel::Line(LineChannel::Prediction),
        indicators.show_prediction,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap() + Duration::minutes(n)
    }

    fn bar(n: i64, open: f64, close: f64) -> Bar {
        Bar {
            timestamp: t(n),
            open,
            high: open.max(close) + 0.5,
            low: open.min(close) - 0.5,
            close,
            volume: 100 * n as u64,
        }
    }

    #[test]
    fn volume_tone_follows_strict_close_above_open() {
        let series = Series::new(vec![bar(1, 10.0, 12.0), bar(2, 10.0, 10.0), bar(3, 12.0, 10.0)])
            .unwrap();
        let tones: Vec<VolumeTone> = project_volume(&series).iter().map(|v| v.tone).collect();
        assert_eq!(tones, [VolumeTone::Up, VolumeTone::Down, VolumeTone::Down]);
    }

    #[test]
    fn prediction_is_anchored_on_last_close() {
        let series = Series::new(vec![bar(4, 98.0, 99.0), bar(5, 99.0, 100.0)]).unwrap();
        let predictions = vec![
            PredictionPoint {
                timestamp: t(6),
                price: 105.0,
            },
            PredictionPoint {
                timestamp: t(7),
                price: 110.0,
            },
        ];

        let line = project_prediction(&series, &predictions);
        let pairs: Vec<(DateTime<Utc>, f64)> = line.iter().map(|p| (p.time, p.value)).collect();
        assert_eq!(pairs, [(t(5), 100.0), (t(6), 105.0), (t(7), 110.0)]);
    }

    #[test]
    fn no_predictions_means_no_line() {
        let series = Series::new(vec![bar(5, 99.0, 100.0)]).unwrap();
        assert!(project_prediction(&series, &[]).is_empty());
    }

    #[test]
    fn empty_series_omits_anchor() {
        let predictions = vec![PredictionPoint {
            timestamp: t(6),
            price: 105.0,
        }];
        let line = project_prediction(&Series::default(), &predictions);
        assert_eq!(line.len(), 1);
        assert_eq!(line[0].value, 105.0);
    }

    #[test]
    fn line_mode_projects_closes() {
        let series = Series::new(vec![bar(1, 10.0, 12.0), bar(2, 12.0, 11.0)]).unwrap();
        match project_price(&series, RenderMode::Line) {
            PriceData::Close(points) => {
                assert_eq!(points.iter().map(|p| p.value).collect::<Vec<_>>(), [12.0, 11.0]);
            }
            other => panic!("expected close-only data, got {other:?}"),
        }
    }

    #[test]
    fn ohlc_projection_preserves_prices_exactly() {
        let bars = vec![bar(1, 10.125, 12.375), bar(2, 12.375, 11.0625)];
        let series = Series::new(bars.clone()).unwrap();

        for mode in [RenderMode::Candle, RenderMode::Bar] {
            let PriceData::Ohlc(points) = project_price(&series, mode) else {
                panic!("expected OHLC data for {mode:?}");
            };
            for (point, bar) in points.iter().zip(&bars) {
                assert_eq!(point.time, bar.timestamp);
                assert_eq!(
                    (point.open, point.high, point.low, point.close),
                    (bar.open, bar.high, bar.low, bar.close)
                );
            }
        }
    }
}
