use crate::prelude::{UtilError, UtilResult};
use ndarray::Array2;

/// Cartesian triple, `(x, y, z)` or `(length, height, width)` for sizes.
pub type Vector3 = [f64; 3];

/// One object reported by a simulated sensor.
///
/// The record is produced and updated by the detection pipeline; this crate
/// only reads it when encoding. `rotation` and `bounding_box` travel with the
/// record but are never part of the encoded form.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedObject {
    pub object_type: String,
    pub confidence: f64,
    pub proj_string: String,
    pub object_id: i64,
    pub position: Vector3,
    pub position_covariance: Array2<f64>,
    pub velocity: Vector3,
    pub velocity_covariance: Array2<f64>,
    pub angular_velocity: Vector3,
    pub angular_velocity_covariance: Array2<f64>,
    pub size: Vector3,
    /// Seconds.
    pub timestamp: f64,
    pub sensor_id: String,
    pub rotation: Array2<f64>,
    pub bounding_box: Vec<Vector3>,
}

impl DetectedObject {
    pub fn new(
        object_type: impl Into<String>,
        object_id: i64,
        sensor_id: impl Into<String>,
        timestamp: f64,
    ) -> Self {
        Self {
            object_type: object_type.into(),
            confidence: 1.0,
            proj_string: String::new(),
            object_id,
            position: [0.0; 3],
            position_covariance: Array2::zeros((3, 3)),
            velocity: [0.0; 3],
            velocity_covariance: Array2::zeros((3, 3)),
            angular_velocity: [0.0; 3],
            angular_velocity_covariance: Array2::zeros((3, 3)),
            size: [0.0; 3],
            timestamp,
            sensor_id: sensor_id.into(),
            rotation: Array2::eye(3),
            bounding_box: Vec::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_proj_string(mut self, proj_string: impl Into<String>) -> Self {
        self.proj_string = proj_string.into();
        self
    }

    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vector3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_size(mut self, size: Vector3) -> Self {
        self.size = size;
        self
    }

    pub fn with_position_covariance(mut self, covariance: Array2<f64>) -> Self {
        self.position_covariance = covariance;
        self
    }

    pub fn with_velocity_covariance(mut self, covariance: Array2<f64>) -> Self {
        self.velocity_covariance = covariance;
        self
    }

    pub fn with_angular_velocity_covariance(mut self, covariance: Array2<f64>) -> Self {
        self.angular_velocity_covariance = covariance;
        self
    }

    /// Timestamp in whole milliseconds, truncated toward zero.
    pub fn timestamp_millis(&self) -> UtilResult<i64> {
        if !self.timestamp.is_finite() {
            return Err(UtilError::NonFinite { field: "timestamp" });
        }
        let millis = (self.timestamp * 1000.0).trunc();
        if millis < i64::MIN as f64 || millis >= i64::MAX as f64 {
            return Err(UtilError::TimestampRange(self.timestamp));
        }
        Ok(millis as i64)
    }
}
