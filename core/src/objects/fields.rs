use crate::math::{round_to_places, NestedArray};
use crate::objects::detected::{DetectedObject, Vector3};
use crate::prelude::{UtilError, UtilResult};
use ndarray::ArrayView2;
use serde::{Serialize, Serializer};

const DECIMALS: usize = 3;

/// Capability of a record to present itself in the detected-object wire
/// layout. Only records the downstream consumer understands implement it.
pub trait ToSerializableFields {
    fn to_serializable_fields(&self) -> UtilResult<SerializableFields<'_>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimensions {
    pub length: f64,
    pub height: f64,
    pub width: f64,
}

/// Covariance matrix encoded as an array of rows.
#[derive(Debug, Clone)]
pub struct Covariance<'a>(pub ArrayView2<'a, f64>);

impl Serialize for Covariance<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NestedArray(self.0.view().into_dyn()).serialize(serializer)
    }
}

/// Wire layout of a detected object. Field order is part of the format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableFields<'a> {
    #[serde(rename = "type")]
    pub object_type: &'a str,
    pub confidence: f64,
    pub proj_string: &'a str,
    pub object_id: i64,
    pub position: Xyz,
    pub position_covariance: Covariance<'a>,
    pub velocity: Xyz,
    pub velocity_covariance: Covariance<'a>,
    pub angular_velocity: Xyz,
    pub angular_velocity_covariance: Covariance<'a>,
    pub size: Dimensions,
    /// Milliseconds.
    pub timestamp: i64,
    pub sensor_id: &'a str,
}

fn finite(value: f64, field: &'static str) -> UtilResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(UtilError::NonFinite { field })
    }
}

fn rounded(vector: &Vector3, field: &'static str) -> UtilResult<Vector3> {
    let mut out = [0.0; 3];
    for (slot, &value) in out.iter_mut().zip(vector) {
        *slot = round_to_places(finite(value, field)?, DECIMALS);
    }
    Ok(out)
}

fn rounded_xyz(vector: &Vector3, field: &'static str) -> UtilResult<Xyz> {
    let [x, y, z] = rounded(vector, field)?;
    Ok(Xyz { x, y, z })
}

impl ToSerializableFields for DetectedObject {
    fn to_serializable_fields(&self) -> UtilResult<SerializableFields<'_>> {
        let [length, height, width] = rounded(&self.size, "size")?;
        Ok(SerializableFields {
            object_type: &self.object_type,
            confidence: finite(self.confidence, "confidence")?,
            proj_string: &self.proj_string,
            object_id: self.object_id,
            position: rounded_xyz(&self.position, "position")?,
            position_covariance: Covariance(self.position_covariance.view()),
            velocity: rounded_xyz(&self.velocity, "velocity")?,
            velocity_covariance: Covariance(self.velocity_covariance.view()),
            angular_velocity: rounded_xyz(&self.angular_velocity, "angularVelocity")?,
            angular_velocity_covariance: Covariance(self.angular_velocity_covariance.view()),
            size: Dimensions {
                length,
                height,
                width,
            },
            timestamp: self.timestamp_millis()?,
            sensor_id: &self.sensor_id,
        })
    }
}
