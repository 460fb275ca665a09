use serde::Serialize;
use crate::models::forecast_request::ForecastRequest;

/// Number of hourly slots in a forecast
pub const SERIES_LEN: usize = 24;

/// Hourly demand predictions in MW, slot 0 being the request start hour
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ForecastSeries {
    start_hour: u8,
    values: [f64; SERIES_LEN],
}

impl ForecastSeries {
    /// Returns a new series
    ///
    /// # Arguments
    ///
    /// * 'start_hour' - hour of day that slot 0 represents
    /// * 'values' - demand per slot
    pub fn new(start_hour: u8, values: [f64; SERIES_LEN]) -> ForecastSeries {
        ForecastSeries { start_hour: start_hour % SERIES_LEN as u8, values }
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn values(&self) -> &[f64; SERIES_LEN] {
        &self.values
    }

    /// Hour of day represented by the given slot
    ///
    /// # Arguments
    ///
    /// * 'slot' - slot index, 0..24
    pub fn hour_of_slot(&self, slot: usize) -> u8 {
        ((self.start_hour as usize + slot) % SERIES_LEN) as u8
    }

    /// Labels for every slot in slot order, e.g. "07:00"
    pub fn hour_labels(&self) -> Vec<String> {
        (0..SERIES_LEN).map(|i| hour_label(self.hour_of_slot(i))).collect()
    }
}

/// Formats an hour of day as "HH:00"
///
/// # Arguments
///
/// * 'hour' - hour of day
pub fn hour_label(hour: u8) -> String {
    format!("{:0>2}:00", hour)
}

/// A generated series together with the request it was generated from
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Prediction {
    pub request: ForecastRequest,
    pub series: ForecastSeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_wrap_around_midnight() {
        let series = ForecastSeries::new(22, [0.0; SERIES_LEN]);
        let labels = series.hour_labels();
        assert_eq!(labels.len(), SERIES_LEN);
        assert_eq!(labels[0], "22:00");
        assert_eq!(labels[1], "23:00");
        assert_eq!(labels[2], "00:00");
        assert_eq!(labels[23], "21:00");
    }

    #[test]
    fn hour_of_slot_is_modular() {
        let series = ForecastSeries::new(5, [0.0; SERIES_LEN]);
        for i in 0..SERIES_LEN {
            assert_eq!(series.hour_of_slot(i) as usize, (5 + i) % 24);
        }
    }
}
