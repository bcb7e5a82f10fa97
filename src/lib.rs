pub mod config;
pub mod core;
pub mod models;

pub use config::Settings;
pub use models::{
    AnalysisResults, Channel, NoGoZone, PredictionSet, QuantifiedMapEntry, TimeseriesPoint,
    VIOLATION_THRESHOLD_KM2,
};

#[cfg(feature = "gui")]
pub mod gui;
