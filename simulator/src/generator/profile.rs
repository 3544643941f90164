use anyhow::ensure;
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use simsensorcore::objects::{DetectedObject, Vector3};
use std::f64::consts::PI;

/// Configuration for generating synthetic detected objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub object_count: usize,
    pub object_type: String,
    pub sensor_id: String,
    pub proj_string: String,
    pub seed: u64,
    /// Half-width of the square area objects start in, metres.
    pub area_m: f64,
    pub max_speed: f64,
    pub position_noise: f64,
    pub timestamp_start: f64,
    /// Seconds between frames.
    pub frame_interval: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            object_count: 8,
            object_type: "CAR".to_string(),
            sensor_id: "sensor-0".to_string(),
            proj_string: "+proj=tmerc +lat_0=0 +lon_0=0 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m"
                .to_string(),
            seed: 0,
            area_m: 100.0,
            max_speed: 15.0,
            position_noise: 0.05,
            timestamp_start: 0.0,
            frame_interval: 0.05,
        }
    }
}

impl GeneratorConfig {
    fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("area_m", self.area_m),
            ("max_speed", self.max_speed),
            ("position_noise", self.position_noise),
            ("frame_interval", self.frame_interval),
        ] {
            ensure!(
                value.is_finite() && value >= 0.0,
                "generator {} must be a non-negative number, got {}",
                name,
                value
            );
        }
        for (name, value) in [("area_m", self.area_m), ("position_noise", self.position_noise)] {
            ensure!(
                (2.0 * value).is_finite(),
                "generator {} is too large to sample from, got {}",
                name,
                value
            );
        }
        ensure!(
            self.timestamp_start.is_finite(),
            "generator timestamp_start must be finite"
        );
        Ok(())
    }

    fn size(&self) -> Vector3 {
        match self.object_type.as_str() {
            "CAR" | "SMALL_VEHICLE" => [4.5, 1.5, 1.8],
            "LARGE_VEHICLE" | "TRUCK" => [12.0, 3.5, 2.5],
            "MOTORCYCLE" => [2.2, 1.4, 0.8],
            "PEDESTRIAN" => [0.5, 1.7, 0.5],
            _ => [1.0, 1.0, 1.0],
        }
    }
}

/// Diagonal 3x3 covariance with the same variance on every axis.
fn covariance(variance: f64) -> Array2<f64> {
    Array2::<f64>::eye(3) * variance
}

/// Builds the objects seen in `frame`.
///
/// Starting states depend only on the seed, so every frame reports the same
/// objects moved along their velocity by `frame * frame_interval` seconds,
/// with fresh per-frame measurement noise.
pub fn build_detected_objects(
    config: &GeneratorConfig,
    frame: usize,
) -> anyhow::Result<Vec<DetectedObject>> {
    config.validate()?;

    let elapsed = frame as f64 * config.frame_interval;
    let timestamp = config.timestamp_start + elapsed;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut noise_rng = StdRng::seed_from_u64(config.seed.wrapping_add(frame as u64 + 1));
    let noise = config.position_noise;
    let mut objects = Vec::with_capacity(config.object_count);

    for index in 0..config.object_count {
        let start = [
            rng.gen_range(-config.area_m..=config.area_m),
            rng.gen_range(-config.area_m..=config.area_m),
            0.0,
        ];
        let heading = rng.gen_range(0.0..2.0 * PI);
        let speed = rng.gen_range(0.0..=config.max_speed);
        let yaw_rate = rng.gen_range(-0.2..=0.2);
        let confidence = rng.gen_range(0.5..=1.0);

        let velocity = [speed * heading.cos(), speed * heading.sin(), 0.0];
        let mut position = [0.0; 3];
        for ((slot, origin), rate) in position.iter_mut().zip(start).zip(velocity) {
            *slot = origin + rate * elapsed + noise_rng.gen_range(-noise..=noise);
        }

        let object = DetectedObject::new(
            config.object_type.clone(),
            index as i64 + 1,
            config.sensor_id.clone(),
            timestamp,
        )
        .with_confidence(confidence)
        .with_proj_string(config.proj_string.clone())
        .with_position(position)
        .with_velocity(velocity)
        .with_angular_velocity([0.0, 0.0, yaw_rate])
        .with_size(config.size())
        .with_position_covariance(covariance(noise * noise))
        .with_velocity_covariance(covariance(0.1))
        .with_angular_velocity_covariance(covariance(0.01));
        objects.push(object);
    }

    Ok(objects)
}
