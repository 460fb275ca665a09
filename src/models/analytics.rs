use std::fmt;
use serde::Serialize;

/// One of the highest demand hours in a series
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PeakEntry {
    pub hour_label: String,
    pub value: f64,
}

impl fmt::Display for PeakEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {:>6.0} MW", self.hour_label, self.value)
    }
}

/// Summary statistics over a demand series
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Analytics {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub total: f64,
    pub peaks: Vec<PeakEntry>,
}

/// Mock model accuracy figures shown alongside a prediction
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Accuracy {
    pub mape: f64,
    pub rmse: f64,
}

impl Accuracy {
    /// Model confidence in percent
    pub fn confidence(&self) -> f64 {
        100.0 - self.mape
    }
}
