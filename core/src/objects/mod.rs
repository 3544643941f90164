pub mod detected;
pub mod fields;

pub use detected::{DetectedObject, Vector3};
pub use fields::{SerializableFields, ToSerializableFields};
