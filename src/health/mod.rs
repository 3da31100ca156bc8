//! Plant-health evaluation: category thresholds, value normalisation and the
//! ideal-range predicates. Everything here is pure and synchronous.

pub mod categories;
pub mod evaluator;
pub mod normalize;

pub use categories::{Humidity, Lighting, Moisture, Temperature};
pub use evaluator::{HealthEvaluator, HealthVerdict};
pub use normalize::{normalize_light_intensity, normalize_moisture, CalibrationError, MoistureCalibration};
