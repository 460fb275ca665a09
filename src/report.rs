use std::fmt;
use std::fmt::Formatter;
use serde::Serialize;
use crate::analytics::{analyze, mock_accuracy, weather_insight};
use crate::models::analytics::{Accuracy, Analytics};
use crate::models::forecast_series::Prediction;
use crate::noise::NoiseSource;

/// Width of the bars in the demand chart
const BAR_WIDTH: f64 = 50.0;

/// Everything shown for one prediction
#[derive(Serialize, Debug)]
pub struct Dashboard {
    pub prediction: Prediction,
    pub analytics: Analytics,
    pub accuracy: Accuracy,
}

impl Dashboard {
    /// Returns a new Dashboard with analytics and accuracy figures derived from the prediction
    ///
    /// # Arguments
    ///
    /// * 'prediction' - the prediction to show
    /// * 'noise' - noise source for the mock accuracy figures
    pub fn new<N: NoiseSource + ?Sized>(prediction: Prediction, noise: &mut N) -> Dashboard {
        let analytics = analyze(&prediction.series);
        let accuracy = mock_accuracy(noise);

        Dashboard { prediction, analytics, accuracy }
    }

    /// Short insight lines for the summary section
    pub fn insights(&self) -> Vec<String> {
        let request = &self.prediction.request;
        let mut lines = Vec::new();

        if let Some(peak) = self.analytics.peaks.first() {
            lines.push(format!("Peak demand expected around {} with {:.0} MW", peak.hour_label, peak.value));
        }
        lines.push(format!("Weather conditions suggest {} energy consumption", weather_insight(request.temperature)));
        lines.push(format!("{} model confidence: {:.1}%", request.model.code().to_uppercase(), self.accuracy.confidence()));

        lines
    }
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let request = &self.prediction.request;
        let series = &self.prediction.series;
        let a = &self.analytics;

        let caption = format!("Demand Forecast for {} starting at {:0>2}:00 ({}) ",
                              request.date.format("%Y-%m-%d"), request.hour, request.model.display_name());
        writeln!(f, "{:=<80}", caption)?;
        writeln!(f, "Average demand {:>8.0} MW   Peak demand {:>8.0} MW", a.average, a.max)?;
        writeln!(f, "Minimum demand {:>8.0} MW   Total       {:>8.0} MWh", a.min, a.total)?;
        writeln!(f, "MAPE {:.2}%, RMSE {:.1} MW", self.accuracy.mape, self.accuracy.rmse)?;

        writeln!(f, "{:-<80}", "Weather Conditions ")?;
        writeln!(f, "Temperature {:.1}°C, Humidity {:.0}%, Rainfall {:.1} mm, Wind Speed {:.1} km/h",
                 request.temperature, request.humidity, request.rainfall, request.wind_speed)?;

        writeln!(f, "{:-<80}", "24-Hour Demand Forecast ")?;
        for (label, value) in series.hour_labels().iter().zip(series.values().iter()) {
            let len = if a.max > 0.0 { (value / a.max * BAR_WIDTH).round() as usize } else { 0 };
            writeln!(f, "{} {:<50} {:>6.0} MW", label, "#".repeat(len), value)?;
        }

        writeln!(f, "{:-<80}", "Top 6 Peak Hours ")?;
        for (i, peak) in a.peaks.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, peak)?;
        }

        writeln!(f, "{:-<80}", "Forecast Summary ")?;
        for line in self.insights() {
            writeln!(f, "* {}", line)?;
        }

        Ok(())
    }
}
