use crate::models::analytics::{Accuracy, Analytics, PeakEntry};
use crate::models::forecast_series::{hour_label, ForecastSeries, SERIES_LEN};
use crate::noise::NoiseSource;

/// Number of entries in the peak hours ranking
pub const PEAK_COUNT: usize = 6;

/// Noise stream the mock accuracy figures are drawn from, apart from the generator's
pub const ACCURACY_NOISE_STREAM: u64 = 1;

/// Temperature above which the insight text calls for higher cooling demand
const COOLING_THRESHOLD: f64 = 30.0;

/// Derives summary statistics and peak hours from a demand series
///
/// # Arguments
///
/// * 'series' - the demand series
pub fn analyze(series: &ForecastSeries) -> Analytics {
    let values = series.values();
    let sum = values.iter().sum::<f64>();

    Analytics {
        average: (sum / SERIES_LEN as f64).round(),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        total: sum.round(),
        peaks: peak_hours(series, PEAK_COUNT),
    }
}

/// Returns the top `count` hours sorted by demand, highest first.
///
/// The sort is stable so among equal values the earlier slot comes first.
///
/// # Arguments
///
/// * 'series' - the demand series
/// * 'count' - max number of entries to return
pub fn peak_hours(series: &ForecastSeries, count: usize) -> Vec<PeakEntry> {
    let mut ranked = series.values()
        .iter()
        .enumerate()
        .map(|(i, &value)| (i, value))
        .collect::<Vec<(usize, f64)>>();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked.into_iter()
        .take(count)
        .map(|(i, value)| PeakEntry { hour_label: hour_label(series.hour_of_slot(i)), value })
        .collect()
}

/// Describes the expected consumption level given the temperature
///
/// # Arguments
///
/// * 'temperature' - temperature in °C
pub fn weather_insight(temperature: f64) -> &'static str {
    if temperature > COOLING_THRESHOLD { "higher cooling" } else { "moderate" }
}

/// Mock accuracy figures, MAPE in [5, 8) and RMSE in [25, 35)
///
/// # Arguments
///
/// * 'noise' - noise source
pub fn mock_accuracy<N: NoiseSource + ?Sized>(noise: &mut N) -> Accuracy {
    let mape = 5.0 + noise.unit() * 3.0;
    let rmse = 25.0 + noise.unit() * 10.0;

    Accuracy { mape, rmse }
}
