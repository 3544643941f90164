//! Config loading and detected-object JSON encoding for the simulated sensor
//! platform.
//!
//! The detection pipeline itself lives elsewhere; this crate reads YAML
//! configuration and renders detected objects in the JSON layout the
//! downstream co-simulation consumer expects.

pub mod math;
pub mod objects;
pub mod prelude;
pub mod util;

pub use objects::{DetectedObject, ToSerializableFields};
pub use prelude::{UtilError, UtilResult};
pub use util::{load_config_from_file, serialize_to_json, SerializableValue};
