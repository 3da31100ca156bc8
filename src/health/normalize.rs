//! Conversion of raw sensor units into 0..=100 percentages for display and
//! comparison.

use thiserror::Error;

/// Raw light intensity that maps to 100 %.
pub const LIGHT_SATURATION: i64 = 1500;

/// Moisture readings above this value are in the sensor's alternate raw
/// range and must be rescaled.
pub const MOISTURE_PERCENT_MAX: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalibrationError {
    #[error("moisture scale must be positive, got {0}")]
    NonPositiveScale(i64),
}

/// Linear map for moisture readings in the alternate raw range:
/// `100 - (raw - offset) * 100 / scale`.
///
/// Higher raw resistance means drier soil, so the result decreases as `raw`
/// grows. `scale` is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoistureCalibration {
    offset: i64,
    scale: i64,
}

impl MoistureCalibration {
    /// Constants used by health evaluation.
    pub const CURRENT: Self = Self {
        offset: 1500,
        scale: 1000,
    };

    /// Constants the chart view used in an earlier revision.
    pub const CHART_LEGACY: Self = Self {
        offset: 1000,
        scale: 1500,
    };

    pub fn new(offset: i64, scale: i64) -> Result<Self, CalibrationError> {
        if scale <= 0 {
            return Err(CalibrationError::NonPositiveScale(scale));
        }
        Ok(Self { offset, scale })
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Normalise a raw moisture reading into `0..=100`.
    ///
    /// Values already within the percentage range pass through; everything is
    /// clamped afterwards. Intermediate maths runs in `i128` so no input can
    /// overflow.
    pub fn normalize(&self, raw: i64) -> i64 {
        let percent = if raw > MOISTURE_PERCENT_MAX {
            let delta = (i128::from(raw) - i128::from(self.offset)) * 100 / i128::from(self.scale);
            100 - delta
        } else {
            i128::from(raw)
        };
        percent.clamp(0, 100) as i64
    }
}

impl Default for MoistureCalibration {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// Normalise a raw light reading: linear over `0..=1500`, saturating at 100
/// and never below 0.
pub fn normalize_light_intensity(raw: i64) -> i64 {
    if raw > LIGHT_SATURATION {
        100
    } else if raw <= 0 {
        0
    } else {
        100 * raw / LIGHT_SATURATION
    }
}

pub fn normalize_moisture(raw: i64, calibration: &MoistureCalibration) -> i64 {
    calibration.normalize(raw)
}
