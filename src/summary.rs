//! Summary formatter for the latest-value panel.

use crate::store::Dataset;

/// Latest values of the loaded dataset, rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPanel {
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    /// Last bar's volume with thousands separators.
    pub volume: String,
    pub predicted_price: Option<String>,
    /// Signed change of the last close versus the previous one.
    pub price_change: Option<String>,
    pub percent_change: Option<String>,
    /// `true` when the change is non-negative; `None` without a previous bar.
    pub rising: Option<bool>,
}

/// Summarizes `dataset`, or `None` if it holds no bars.
///
/// Change fields need two bars; with one they are absent rather than zero.
pub fn summarize(dataset: &Dataset) -> Option<SummaryPanel> {
    let last = dataset.series.last()?;

    let change = dataset.series.last_pair().map(|(prev, last)| {
        let change = last.close - prev.close;
        (change, change / prev.close * 100.0)
    });

    Some(SummaryPanel {
        open: format!("{:.2}", last.open),
        high: format!("{:.2}", last.high),
        low: format!("{:.2}", last.low),
        close: format!("{:.2}", last.close),
        volume: group_thousands(last.volume),
        predicted_price: dataset.predictions.last().map(|p| format!("{:.2}", p.price)),
        price_change: change.map(|(abs, _)| signed(abs, "")),
        percent_change: change.map(|(_, pct)| signed(pct, "%")),
        rising: change.map(|(abs, _)| abs >= 0.0),
    })
}

/// Formats to two decimals with an explicit `+` for non-negative values.
fn signed(value: f64, suffix: &str) -> String {
    if value >= 0.0 {
        format!("+{value:.2}{suffix}")
    } else {
        format!("{value:.2}{suffix}")
    }
}

/// Groups digits in threes with `,` (en-US style).
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
